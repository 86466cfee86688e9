//! In-memory fakes of the external collaborators.
use crate::{
    catalog::{
        model::{ContentEntry, EntryType},
        source::{ContentSource, SourceError},
    },
    identity::Identity,
    progress::local::{LocalSlot, SlotError},
    store::{
        NewPersonalProblem, PersonalProblem, PersonalProblemPatch, RecordStore, StoreError,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

const ALL_CSV: &str = "Difficulty,Title,Frequency,Acceptance Rate,Link,Topics
EASY,Two Sum,100.0,0.554,https://leetcode.com/problems/two-sum,\"Array, Hash Table\"
HARD,Median of Two Sorted Arrays,62.5,0.421,https://leetcode.com/problems/median-of-two-sorted-arrays,\"Array, Binary Search\"
";

const THIRTY_DAYS_CSV: &str = "Difficulty,Title,Frequency,Acceptance Rate,Link,Topics
MEDIUM,LRU Cache,88.1,0.445,https://leetcode.com/problems/lru-cache,Design
";

const THREE_MONTHS_CSV: &str = "Difficulty,Title,Frequency,Acceptance Rate,Link,Topics
MEDIUM,Number of Islands,70.0,0.6,https://leetcode.com/problems/number-of-islands,Graph
";

/// Content source over a fixed tree. Paths and URLs can be scripted to fail.
#[derive(Default)]
pub struct ScriptedSource {
    listings: HashMap<String, Vec<ContentEntry>>,
    files: HashMap<String, String>,
    failures: Mutex<HashMap<String, u16>>,
}

fn dir(path: &str) -> ContentEntry {
    ContentEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        entry_type: EntryType::Dir,
        download_url: None,
    }
}

fn file(path: &str) -> ContentEntry {
    ContentEntry {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        entry_type: EntryType::File,
        download_url: Some(format!("mem://{}", path)),
    }
}

impl ScriptedSource {
    pub fn sample() -> Self {
        let mut source = Self::default();
        source.listings.insert(
            String::new(),
            vec![dir(".github"), dir("Amazon"), dir("Google"), file("README.md")],
        );
        source.listings.insert(
            String::from("Google"),
            vec![
                file("Google/1. Thirty Days.csv"),
                file("Google/5. All.csv"),
                file("Google/notes.txt"),
            ],
        );
        source.listings.insert(
            String::from("Amazon"),
            vec![file("Amazon/2. Three Months.csv")],
        );
        source.files.insert(
            String::from("mem://Google/5. All.csv"),
            String::from(ALL_CSV),
        );
        source.files.insert(
            String::from("mem://Google/1. Thirty Days.csv"),
            String::from(THIRTY_DAYS_CSV),
        );
        source.files.insert(
            String::from("mem://Amazon/2. Three Months.csv"),
            String::from(THREE_MONTHS_CSV),
        );
        source
    }

    /// Makes listing `path` (or downloading `url`) answer with `status`.
    pub fn fail(&self, path_or_url: &str, status: u16) {
        self.failures
            .lock()
            .unwrap()
            .insert(path_or_url.to_string(), status);
    }

    pub fn recover(&self, path_or_url: &str) {
        self.failures.lock().unwrap().remove(path_or_url);
    }

    fn check(&self, key: &str) -> Result<(), SourceError> {
        match self.failures.lock().unwrap().get(key) {
            Some(403) | Some(429) => Err(SourceError::RateLimited),
            Some(status) => Err(SourceError::UnexpectedStatus(*status, key.to_string())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    async fn list_children(&self, path: &str) -> Result<Vec<ContentEntry>, SourceError> {
        self.check(path)?;
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::UnexpectedStatus(404, path.to_string()))
    }

    async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        self.check(url)?;
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| SourceError::UnexpectedStatus(404, url.to_string()))
    }
}

#[derive(Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl LocalSlot for MemorySlot {
    async fn get(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SlotError> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct Records {
    rows: Vec<PersonalProblem>,
    next_id: i64,
    calls: usize,
    inserts: usize,
    fail_reads: bool,
    fail_updates: HashSet<i64>,
}

/// Record store holding rows in memory with the same owner scoping as the database.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<Records>,
}

impl MemoryRecordStore {
    pub async fn seed(
        &self,
        owner: &Identity,
        title: &str,
        status: Option<&str>,
        remarks: Option<&str>,
    ) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(PersonalProblem {
            id,
            created_at: Utc::now(),
            difficulty: Some(String::from("Easy")),
            title: Some(title.to_string()),
            link: None,
            topics: None,
            company: None,
            status: status.map(String::from),
            remarks: remarks.map(String::from),
            user_id: Some(owner.as_str().to_string()),
        });
        id
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_update(&self, id: i64) {
        self.inner.lock().unwrap().fail_updates.insert(id);
    }

    pub async fn get(&self, id: i64) -> Option<PersonalProblem> {
        self.inner
            .lock()
            .unwrap()
            .rows
            .iter()
            .find(|row| row.id == id)
            .cloned()
    }

    /// Number of store operations received.
    pub fn calls(&self) -> usize {
        self.inner.lock().unwrap().calls
    }

    pub fn inserts(&self) -> usize {
        self.inner.lock().unwrap().inserts
    }
}

fn owned_by(row: &PersonalProblem, owner: &Identity) -> bool {
    row.user_id.as_deref() == Some(owner.as_str())
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn select_all_owned_by(
        &self,
        owner: &Identity,
    ) -> Result<Vec<PersonalProblem>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        if inner.fail_reads {
            return Err(StoreError::UnexpectedError(String::from("connection refused")));
        }

        let mut rows: Vec<PersonalProblem> = inner
            .rows
            .iter()
            .filter(|row| owned_by(row, owner))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert_owned(
        &self,
        record: &NewPersonalProblem,
    ) -> Result<PersonalProblem, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        let duplicated = inner.rows.iter().any(|row| {
            row.user_id.as_deref() == Some(record.user_id.as_str())
                && row.title.as_deref() == Some(record.title.as_str())
        });
        if duplicated {
            return Err(StoreError::Duplicate(record.title.clone()));
        }

        inner.inserts += 1;
        inner.next_id += 1;
        let row = PersonalProblem {
            id: inner.next_id,
            created_at: Utc::now(),
            difficulty: Some(record.difficulty.clone()),
            title: Some(record.title.clone()),
            link: Some(record.link.clone()),
            topics: Some(record.topics.clone()),
            company: Some(record.company.clone()),
            status: Some(record.status.to_string()),
            remarks: Some(String::new()),
            user_id: Some(record.user_id.clone()),
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn update_by_id(
        &self,
        owner: &Identity,
        id: i64,
        patch: &PersonalProblemPatch,
    ) -> Result<PersonalProblem, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        if inner.fail_updates.contains(&id) {
            return Err(StoreError::UnexpectedError(String::from("connection reset")));
        }

        let row = inner
            .rows
            .iter_mut()
            .find(|row| row.id == id && owned_by(row, owner))
            .ok_or(StoreError::NotFound(id))?;
        if let Some(status) = patch.status {
            row.status = Some(status.to_string());
        }
        if let Some(remarks) = &patch.remarks {
            row.remarks = Some(remarks.clone());
        }
        Ok(row.clone())
    }

    async fn delete_by_id(&self, owner: &Identity, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        let before = inner.rows.len();
        inner.rows.retain(|row| !(row.id == id && owned_by(row, owner)));
        if inner.rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn exists_by_title_owned_by(
        &self,
        owner: &Identity,
        title: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls += 1;
        Ok(inner
            .rows
            .iter()
            .any(|row| owned_by(row, owner) && row.title.as_deref() == Some(title)))
    }
}
