//! Progress persistence over two backends.
//!
//! The local slot always holds a mirror of the last saved map. The remote
//! backend is chosen explicitly per call through [`Backend`]; reads fall back
//! to the local mirror and remote writes are best-effort, so no method of
//! [`ProgressStore`] fails.
use crate::{
    identity::Identity,
    personal::project_progress,
    progress::{
        local::{LocalSlot, PROGRESS_KEY},
        model::{remote_key, ProgressMap, ProgressUpdate, UserProgress},
    },
    store::{PersonalProblemPatch, RecordStore},
};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;

/// Remote half of the backend strategy.
#[derive(Clone, Copy)]
pub struct RemoteBackend<'a> {
    pub owner: &'a Identity,
    pub records: &'a (dyn RecordStore + Send + Sync),
}

/// Where a call reads from and writes to.
#[derive(Clone, Copy)]
pub enum Backend<'a> {
    Local,
    Remote(RemoteBackend<'a>),
}

impl<'a> Backend<'a> {
    pub fn remote(owner: &'a Identity, records: &'a (dyn RecordStore + Send + Sync)) -> Self {
        Backend::Remote(RemoteBackend { owner, records })
    }

    /// Remote when an identity is present, local otherwise.
    pub fn select(
        owner: Option<&'a Identity>,
        records: &'a (dyn RecordStore + Send + Sync),
    ) -> Self {
        match owner {
            Some(owner) => Backend::remote(owner, records),
            None => Backend::Local,
        }
    }

    pub fn owner(&self) -> Option<&'a Identity> {
        match self {
            Backend::Local => None,
            Backend::Remote(remote) => Some(remote.owner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LoadSource {
    Local,
    Remote,
    /// The remote read failed; the local mirror was used instead.
    LocalFallback(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    pub progress: ProgressMap,
    pub source: LoadSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpdate {
    pub id: i64,
    pub reason: String,
}

/// Result of one save call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    /// Set when mirroring to the local slot failed.
    pub local_error: Option<String>,
    pub synced: Vec<i64>,
    /// Keys that are not record ids and stay local-only.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedUpdate>,
}

impl SaveReport {
    pub fn synced_count(&self) -> usize {
        self.synced.len()
    }

    pub fn is_complete(&self) -> bool {
        self.local_error.is_none() && self.failed.is_empty()
    }
}

pub struct ProgressStore<L> {
    slot: L,
}

impl<L> ProgressStore<L>
where
    L: LocalSlot + Send + Sync,
{
    pub fn new(slot: L) -> Self {
        Self { slot }
    }

    /// Reads the local mirror. Absent or corrupt data yields an empty map.
    pub async fn load_local(&self) -> ProgressMap {
        let stored = match self.slot.get(PROGRESS_KEY).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return ProgressMap::new(),
            Err(e) => {
                tracing::warn!("failed to read local progress: {:?}", e);
                return ProgressMap::new();
            }
        };

        match serde_json::from_str(&stored) {
            Ok(progress) => progress,
            Err(e) => {
                tracing::warn!("local progress is corrupt and will be ignored: {}", e);
                ProgressMap::new()
            }
        }
    }

    async fn save_local(&self, progress: &ProgressMap) -> Result<(), String> {
        let serialized = serde_json::to_string(progress).map_err(|e| e.to_string())?;
        self.slot
            .set(PROGRESS_KEY, &serialized)
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn load(&self, backend: Backend<'_>) -> LoadOutcome {
        let remote = match backend {
            Backend::Local => {
                return LoadOutcome {
                    progress: self.load_local().await,
                    source: LoadSource::Local,
                }
            }
            Backend::Remote(remote) => remote,
        };

        match remote.records.select_all_owned_by(remote.owner).await {
            Ok(records) => {
                tracing::info!("{} progress entries loaded for {}", records.len(), remote.owner);
                LoadOutcome {
                    progress: project_progress(&records),
                    source: LoadSource::Remote,
                }
            }
            Err(e) => {
                tracing::warn!(
                    "failed to load progress of {} from remote store, use local progress instead: {}",
                    remote.owner,
                    e
                );
                LoadOutcome {
                    progress: self.load_local().await,
                    source: LoadSource::LocalFallback(e.to_string()),
                }
            }
        }
    }

    /// Mirrors `progress` locally, then pushes every record-id entry to the remote backend.
    ///
    /// Remote updates run concurrently and independently; a failed update is
    /// reported and neither rolls back the mirror nor stops the others.
    pub async fn save(&self, progress: &ProgressMap, backend: Backend<'_>) -> SaveReport {
        let mut report = SaveReport::default();

        if let Err(e) = self.save_local(progress).await {
            tracing::error!("failed to save progress to local slot: {}", e);
            report.local_error = Some(e);
        }

        let remote = match backend {
            Backend::Local => return report,
            Backend::Remote(remote) => remote,
        };

        let mut tasks = FuturesUnordered::new();
        for (key, entry) in progress.iter() {
            let Some(id) = remote_key(key) else {
                report.skipped.push(key.clone());
                continue;
            };

            let patch = PersonalProblemPatch {
                status: Some(entry.status),
                remarks: Some(entry.remarks.clone()),
            };
            tasks.push(async move {
                let result = remote.records.update_by_id(remote.owner, id, &patch).await;
                (id, result)
            });
        }

        while let Some((id, result)) = tasks.next().await {
            match result {
                Ok(_) => report.synced.push(id),
                Err(e) => {
                    tracing::error!("failed to sync progress of record {}: {}", id, e);
                    report.failed.push(FailedUpdate {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        report.synced.sort_unstable();
        report.failed.sort_by_key(|failed| failed.id);

        tracing::info!(
            "progress saved for {}: {} synced, {} skipped, {} failed",
            remote.owner,
            report.synced.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    /// Merges `update` onto the entry of `problem_id`, stamps it and writes through [`Self::save`].
    pub async fn update_one(
        &self,
        progress: &ProgressMap,
        problem_id: &str,
        update: &ProgressUpdate,
        backend: Backend<'_>,
    ) -> (ProgressMap, SaveReport) {
        let now = Utc::now();
        let mut updated = progress.clone();
        let entry = updated
            .entry(problem_id.to_string())
            .or_insert_with(|| UserProgress::new(now));
        update.apply(entry);
        entry.last_updated = now.max(entry.last_updated);

        let report = self.save(&updated, backend).await;
        (updated, report)
    }
}
