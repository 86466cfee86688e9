//! Remote record store for tracked problems.
//!
//! Every operation is scoped to one owner; the store itself enforces that a
//! user only sees and mutates their own rows.
pub mod postgres;

use crate::{
    api::FieldList,
    catalog::model::Problem,
    identity::Identity,
    progress::model::Status,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leettrack_derive::FieldList;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found or not permitted")]
    NotFound(i64),
    #[error("a record titled `{0}` already exists")]
    Duplicate(String),
    #[error("failed to access record store")]
    DatabaseError(#[from] sqlx::Error),
    #[error("{0}")]
    UnexpectedError(String),
}

/// A problem saved by a signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow, FieldList)]
pub struct PersonalProblem {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub difficulty: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub topics: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
    pub remarks: Option<String>,
    pub user_id: Option<String>,
}

impl PersonalProblem {
    /// Stored status, `Not Started` when absent or unreadable.
    pub fn status(&self) -> Status {
        self.status
            .as_deref()
            .and_then(|status| status.parse().ok())
            .unwrap_or_default()
    }
}

/// Fields copied from a catalog problem when it is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPersonalProblem {
    pub user_id: String,
    pub company: String,
    pub difficulty: String,
    pub title: String,
    pub link: String,
    pub topics: String,
    pub status: Status,
}

impl NewPersonalProblem {
    pub fn from_problem(problem: &Problem, owner: &Identity) -> Self {
        Self {
            user_id: owner.as_str().to_string(),
            company: problem.company.clone(),
            difficulty: problem.difficulty.to_string(),
            title: problem.title.clone(),
            link: problem.url.clone(),
            topics: problem.topics.clone(),
            status: Status::NotStarted,
        }
    }
}

/// User-owned mutable fields of a tracked problem.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonalProblemPatch {
    pub status: Option<Status>,
    pub remarks: Option<String>,
}

#[async_trait]
pub trait RecordStore {
    /// All rows of the owner, newest first.
    async fn select_all_owned_by(&self, owner: &Identity) -> Result<Vec<PersonalProblem>>;
    async fn insert_owned(&self, record: &NewPersonalProblem) -> Result<PersonalProblem>;
    async fn update_by_id(
        &self,
        owner: &Identity,
        id: i64,
        patch: &PersonalProblemPatch,
    ) -> Result<PersonalProblem>;
    async fn delete_by_id(&self, owner: &Identity, id: i64) -> Result<()>;
    async fn exists_by_title_owned_by(&self, owner: &Identity, title: &str) -> Result<bool>;
}

pub fn select_columns() -> &'static str {
    PersonalProblem::field_list()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::catalog::model::Difficulty;

    #[test]
    fn test_field_list() {
        assert_eq!(
            select_columns(),
            "id, created_at, difficulty, title, link, topics, company, status, remarks, user_id"
        );
    }

    #[test]
    fn copy_problem_fields() {
        let problem = Problem {
            id: String::from("two-sum"),
            title: String::from("Two Sum"),
            difficulty: Difficulty::Easy,
            acceptance: String::from("55.4%"),
            frequency: String::from("100"),
            url: String::from("https://leetcode.com/problems/two-sum"),
            company: String::from("Google"),
            topics: String::from("Array"),
        };
        let record = NewPersonalProblem::from_problem(&problem, &Identity::new("u1"));

        assert_eq!(record.user_id, "u1");
        assert_eq!(record.difficulty, "Easy");
        assert_eq!(record.link, problem.url);
        assert_eq!(record.status, Status::NotStarted);
    }

    #[test]
    fn unreadable_status_defaults() {
        let record = PersonalProblem {
            id: 1,
            created_at: Utc::now(),
            difficulty: None,
            title: None,
            link: None,
            topics: None,
            company: None,
            status: Some(String::from("???")),
            remarks: None,
            user_id: None,
        };
        assert_eq!(record.status(), Status::NotStarted);
    }
}
