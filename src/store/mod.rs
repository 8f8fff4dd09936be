use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::ContactRecord;

/// Result type for note store operations
pub type StoreResult<T> = Result<T>;

/// Append-only list of contact records, read and written as one collection
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Short description for logs
    fn describe(&self) -> String;

    async fn load_all(&self) -> StoreResult<Vec<ContactRecord>>;

    async fn save_all(&self, records: &[ContactRecord]) -> StoreResult<()>;

    /// Read the collection, push `record`, write it back. Returns the new count.
    async fn append(&self, record: ContactRecord) -> StoreResult<usize> {
        let mut records = self.load_all().await?;
        records.push(record);
        self.save_all(&records).await?;
        Ok(records.len())
    }
}

/// Note store backed by a pretty-printed JSON array on disk
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/lesson-player/contacts.json`, if the platform has a data dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("lesson-player").join("contacts.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl NoteStore for JsonFileStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn load_all(&self) -> StoreResult<Vec<ContactRecord>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content)
            .with_context(|| format!("Malformed note store {}", self.path.display()))
    }

    async fn save_all(&self, records: &[ContactRecord]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// In-memory note store, used when there is no data directory
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ContactRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn load_all(&self) -> StoreResult<Vec<ContactRecord>> {
        Ok(self.records.lock().await.clone())
    }

    async fn save_all(&self, records: &[ContactRecord]) -> StoreResult<()> {
        *self.records.lock().await = records.to_vec();
        Ok(())
    }
}
