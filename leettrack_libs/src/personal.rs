//! Problems a signed-in user saved from the catalog ("My Problems").
use crate::{
    catalog::model::Problem,
    identity::Identity,
    progress::{
        local::LocalSlot,
        model::{ProgressMap, UserProgress},
        store::{Backend, ProgressStore, SaveReport},
    },
    store::{NewPersonalProblem, PersonalProblem, PersonalProblemPatch, RecordStore, StoreError},
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("you must be signed in to manage your problems")]
    NotSignedIn,
    #[error("`{0}` already exists in your problems")]
    Duplicate(String),
    #[error("problem {0} not found or not permitted")]
    NotFound(i64),
    #[error("record store failure: {0}")]
    Store(StoreError),
}

impl TrackerError {
    /// Conditions presented as a notice rather than as a failure.
    pub fn is_warning(&self) -> bool {
        matches!(self, TrackerError::NotSignedIn | TrackerError::Duplicate(_))
    }
}

impl From<StoreError> for TrackerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => TrackerError::NotFound(id),
            StoreError::Duplicate(title) => TrackerError::Duplicate(title),
            e => TrackerError::Store(e),
        }
    }
}

/// Progress view of tracked problems keyed by record id.
pub fn project_progress(records: &[PersonalProblem]) -> ProgressMap {
    records
        .iter()
        .map(|record| {
            (
                record.id.to_string(),
                UserProgress {
                    status: record.status(),
                    remarks: record.remarks.clone().unwrap_or_default(),
                    last_updated: record.created_at,
                },
            )
        })
        .collect()
}

pub struct PersonalProblems<'a> {
    records: &'a (dyn RecordStore + Send + Sync),
}

impl<'a> PersonalProblems<'a> {
    pub fn new(records: &'a (dyn RecordStore + Send + Sync)) -> Self {
        Self { records }
    }

    /// Tracked problems of the owner, newest first. Anonymous callers get nothing.
    pub async fn list(&self, owner: Option<&Identity>) -> Result<Vec<PersonalProblem>> {
        let Some(owner) = owner else {
            tracing::warn!("no signed-in user when listing personal problems");
            return Ok(Vec::new());
        };

        let records = self.records.select_all_owned_by(owner).await?;
        tracing::info!("{} personal problems fetched for {}", records.len(), owner);
        Ok(records)
    }

    pub async fn add(&self, owner: Option<&Identity>, problem: &Problem) -> Result<PersonalProblem> {
        let owner = owner.ok_or(TrackerError::NotSignedIn)?;

        if self
            .records
            .exists_by_title_owned_by(owner, &problem.title)
            .await?
        {
            tracing::info!("{} already tracks {:?}", owner, problem.title);
            return Err(TrackerError::Duplicate(problem.title.clone()));
        }

        let record = NewPersonalProblem::from_problem(problem, owner);
        let inserted = self.records.insert_owned(&record).await?;
        tracing::info!("{:?} added to problems of {}", problem.title, owner);
        Ok(inserted)
    }

    pub async fn update(
        &self,
        owner: Option<&Identity>,
        id: i64,
        patch: &PersonalProblemPatch,
    ) -> Result<PersonalProblem> {
        let owner = owner.ok_or(TrackerError::NotSignedIn)?;
        let updated = self.records.update_by_id(owner, id, patch).await?;
        Ok(updated)
    }

    /// Deletes the record and drops its entry from `progress`.
    pub async fn delete(
        &self,
        owner: Option<&Identity>,
        id: i64,
        progress: &mut ProgressMap,
    ) -> Result<()> {
        let owner = owner.ok_or(TrackerError::NotSignedIn)?;
        self.records.delete_by_id(owner, id).await?;
        progress.remove(&id.to_string());
        Ok(())
    }

    /// Deletes the record and drops its entry from the local progress mirror only.
    ///
    /// Local-only entries stay untouched and no remote progress is written.
    pub async fn delete_from_local<L>(
        &self,
        owner: Option<&Identity>,
        id: i64,
        store: &ProgressStore<L>,
    ) -> Result<SaveReport>
    where
        L: LocalSlot + Send + Sync,
    {
        let mut progress = store.load_local().await;
        self.delete(owner, id, &mut progress).await?;
        Ok(store.save(&progress, Backend::Local).await)
    }
}
