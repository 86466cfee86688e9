use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Key of the slot holding the progress map.
pub const PROGRESS_KEY: &str = "leettrack_progress_v1";

type Result<T> = std::result::Result<T, SlotError>;

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("failed to access local slot")]
    IoError(#[from] std::io::Error),
    #[error("invalid slot key `{0}`")]
    InvalidKey(String),
}

/// Durable string-keyed, string-valued slot scoped to this device.
#[async_trait]
pub trait LocalSlot {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Slot stored as one file per key under a data directory.
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_owned(),
        }
    }

    fn path_of(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(SlotError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl LocalSlot for FileSlot {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_of(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SlotError::IoError(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_of(key)?;
        if !self.dir.exists() {
            tracing::info!("create local data directory {}", self.dir.display());
            tokio::fs::create_dir_all(&self.dir).await?;
        }

        // replace atomically
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_of(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SlotError::IoError(e)),
        }
    }
}
