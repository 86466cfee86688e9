use crate::{
    identity::Identity,
    store::{
        select_columns, NewPersonalProblem, PersonalProblem, PersonalProblemPatch, RecordStore,
        Result, StoreError,
    },
};
use async_trait::async_trait;
use sqlx::{migrate::Migrator, postgres::Postgres, Pool};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

// unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Record store backed by the `personal_problems` table.
pub struct PgRecordStore<'a> {
    pool: &'a Pool<Postgres>,
}

impl<'a> PgRecordStore<'a> {
    pub fn new(pool: &'a Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl<'a> RecordStore for PgRecordStore<'a> {
    async fn select_all_owned_by(&self, owner: &Identity) -> Result<Vec<PersonalProblem>> {
        let sql = format!(
            "SELECT {} FROM personal_problems WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            select_columns()
        );
        let records: Vec<PersonalProblem> = sqlx::query_as(&sql)
            .bind(owner.as_str())
            .fetch_all(self.pool)
            .await?;

        tracing::debug!("{} records selected for {}", records.len(), owner);
        Ok(records)
    }

    async fn insert_owned(&self, record: &NewPersonalProblem) -> Result<PersonalProblem> {
        let sql = format!(
            "
            INSERT INTO personal_problems (user_id, company, difficulty, title, link, topics, status, remarks)
            VALUES ($1, $2, $3, $4, $5, $6, $7, '')
            RETURNING {}
            ",
            select_columns()
        );
        let result = sqlx::query_as::<_, PersonalProblem>(&sql)
            .bind(&record.user_id)
            .bind(&record.company)
            .bind(&record.difficulty)
            .bind(&record.title)
            .bind(&record.link)
            .bind(&record.topics)
            .bind(record.status.as_str())
            .fetch_one(self.pool)
            .await;

        match result {
            Ok(inserted) => {
                tracing::info!("record {} inserted for {}", inserted.id, record.user_id);
                Ok(inserted)
            }
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate(record.title.clone())),
            Err(e) => {
                tracing::error!("failed to insert {:?}: {:?}", record.title, e);
                Err(StoreError::DatabaseError(e))
            }
        }
    }

    async fn update_by_id(
        &self,
        owner: &Identity,
        id: i64,
        patch: &PersonalProblemPatch,
    ) -> Result<PersonalProblem> {
        let sql = format!(
            "
            UPDATE personal_problems
            SET status = COALESCE($1, status), remarks = COALESCE($2, remarks)
            WHERE id = $3 AND user_id = $4
            RETURNING {}
            ",
            select_columns()
        );
        let updated: Option<PersonalProblem> = sqlx::query_as(&sql)
            .bind(patch.status.map(|status| status.as_str()))
            .bind(patch.remarks.as_deref())
            .bind(id)
            .bind(owner.as_str())
            .fetch_optional(self.pool)
            .await?;

        updated.ok_or(StoreError::NotFound(id))
    }

    async fn delete_by_id(&self, owner: &Identity, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM personal_problems WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner.as_str())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        tracing::info!("record {} deleted", id);
        Ok(())
    }

    async fn exists_by_title_owned_by(&self, owner: &Identity, title: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM personal_problems WHERE user_id = $1 AND title = $2)",
        )
        .bind(owner.as_str())
        .bind(title)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }
}
