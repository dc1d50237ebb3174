//! Per-device record of which events this participant already joined.
//!
//! Written once after a successful join and read when an event is opened, so a
//! returning participant goes straight to the "you're in" state.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use midway_core::errors::{MidwayError, MidwayResult};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait JoinedStore: Send + Sync {
    /// Participant id recorded for `slug`, if this device joined it.
    async fn participant_for(&self, slug: &str) -> MidwayResult<Option<Uuid>>;

    async fn remember(&self, slug: &str, participant_id: Uuid) -> MidwayResult<()>;

    async fn has_joined(&self, slug: &str) -> MidwayResult<bool> {
        Ok(self.participant_for(slug).await?.is_some())
    }
}

/// Store that forgets everything when dropped.
#[derive(Debug, Default)]
pub struct MemoryJoinedStore {
    joined: RwLock<HashMap<String, Uuid>>,
}

impl MemoryJoinedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JoinedStore for MemoryJoinedStore {
    async fn participant_for(&self, slug: &str) -> MidwayResult<Option<Uuid>> {
        Ok(self.joined.read().await.get(slug).copied())
    }

    async fn remember(&self, slug: &str, participant_id: Uuid) -> MidwayResult<()> {
        self.joined
            .write()
            .await
            .insert(slug.to_string(), participant_id);
        Ok(())
    }
}

/// Store backed by a JSON file mapping event slug to participant id.
///
/// Writes go to a sibling temp file first and are renamed into place.
#[derive(Debug)]
pub struct FileJoinedStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileJoinedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> MidwayResult<BTreeMap<String, Uuid>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(storage_error(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| storage_error(&self.path, e))
    }

    async fn save(&self, joined: &BTreeMap<String, Uuid>) -> MidwayResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, e))?;
        }

        let contents =
            serde_json::to_string_pretty(joined).map_err(|e| storage_error(&self.path, e))?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| storage_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_error(&self.path, e))
    }
}

#[async_trait]
impl JoinedStore for FileJoinedStore {
    async fn participant_for(&self, slug: &str) -> MidwayResult<Option<Uuid>> {
        Ok(self.load().await?.get(slug).copied())
    }

    async fn remember(&self, slug: &str, participant_id: Uuid) -> MidwayResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut joined = self.load().await?;
        joined.insert(slug.to_string(), participant_id);
        self.save(&joined).await?;

        info!(slug, path = %self.path.display(), "Remembered joined event");
        debug!(events = joined.len(), "Joined store size");
        Ok(())
    }
}

fn storage_error(path: &Path, error: impl std::fmt::Display) -> MidwayError {
    MidwayError::Storage(format!("{}: {}", path.display(), error))
}
