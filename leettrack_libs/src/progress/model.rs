use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;

#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum Status {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    Todo,
    Solving,
    Solved,
    Revise,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::NotStarted,
        Status::Todo,
        Status::Solving,
        Status::Solved,
        Status::Revise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::Todo => "Todo",
            Status::Solving => "Solving",
            Status::Solved => "Solved",
            Status::Revise => "Revise",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status `{0}`")]
pub struct ParseStatusError(pub String);

impl FromStr for Status {
    type Err = ParseStatusError;

    /// Accepts the stored labels as well as loose spellings such as `not-started`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "notstarted" => Ok(Status::NotStarted),
            "todo" => Ok(Status::Todo),
            "solving" => Ok(Status::Solving),
            "solved" => Ok(Status::Solved),
            "revise" => Ok(Status::Revise),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Per-problem progress of one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProgress {
    pub status: Status,
    #[serde(default)]
    pub remarks: String,
    #[serde(rename = "lastUpdated", with = "chrono::serde::ts_milliseconds")]
    pub last_updated: DateTime<Utc>,
}

impl UserProgress {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            status: Status::NotStarted,
            remarks: String::new(),
            last_updated: now,
        }
    }
}

/// Progress keyed by problem identity.
pub type ProgressMap = BTreeMap<String, UserProgress>;

/// Partial update merged onto an existing entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub status: Option<Status>,
    pub remarks: Option<String>,
}

impl ProgressUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            remarks: None,
        }
    }

    pub fn remarks(remarks: impl Into<String>) -> Self {
        Self {
            status: None,
            remarks: Some(remarks.into()),
        }
    }

    pub fn apply(&self, progress: &mut UserProgress) {
        if let Some(status) = self.status {
            progress.status = status;
        }
        if let Some(remarks) = &self.remarks {
            progress.remarks = remarks.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.remarks.is_none()
    }
}

/// Key of an entry that is mirrored to the remote store, i.e. a positive record id.
pub fn remote_key(key: &str) -> Option<i64> {
    key.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_labels() {
        assert_eq!(serde_json::to_string(&Status::NotStarted).unwrap(), r#""Not Started""#);
        assert_eq!("Not Started".parse::<Status>(), Ok(Status::NotStarted));
        assert_eq!("not-started".parse::<Status>(), Ok(Status::NotStarted));
        assert_eq!("SOLVED".parse::<Status>(), Ok(Status::Solved));
        assert!("done".parse::<Status>().is_err());
    }

    #[test]
    fn test_deserialize_local_progress() {
        let raw = r#"
        {
            "two-sum": {"status": "Solved", "remarks": "hash map", "lastUpdated": 1700000000000},
            "12": {"status": "Todo", "lastUpdated": 1700000000001}
        }
        "#;
        let map: ProgressMap = serde_json::from_str(raw).unwrap();

        assert_eq!(map["two-sum"].status, Status::Solved);
        assert_eq!(
            map["two-sum"].last_updated,
            Utc.timestamp_millis_opt(1700000000000).unwrap()
        );
        assert_eq!(map["12"].remarks, "");
    }

    #[test]
    fn merge_partial_update() {
        let mut progress = UserProgress::new(Utc::now());
        progress.remarks = String::from("keep");

        ProgressUpdate::status(Status::Solving).apply(&mut progress);
        assert_eq!(progress.status, Status::Solving);
        assert_eq!(progress.remarks, "keep");

        ProgressUpdate::remarks("two pointers").apply(&mut progress);
        assert_eq!(progress.status, Status::Solving);
        assert_eq!(progress.remarks, "two pointers");
    }

    #[test]
    fn only_positive_integers_are_remote_keys() {
        assert_eq!(remote_key("42"), Some(42));
        assert_eq!(remote_key("0"), None);
        assert_eq!(remote_key("-3"), None);
        assert_eq!(remote_key("two-sum"), None);
        assert_eq!(remote_key("12abc"), None);
    }
}
