//! Forced-teardown ledger.
//!
//! Tracks instances that must be force-deleted by an external reaper if the
//! process dies before a normal deallocation. The ledger is written through
//! to a JSON file on every mutation so it survives an unclean exit; it is
//! advisory bookkeeping and never consulted for allocation decisions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use droidfarm_id::InstanceUuid;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{trace, warn};

/// Errors updating the forced-teardown ledger.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The ledger file could not be written.
    #[error("ledger write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The ledger contents could not be serialized.
    #[error("ledger serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One instance awaiting forced teardown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupEntry {
    pub uuid: InstanceUuid,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

/// File-backed set of instances requiring forced teardown.
pub struct CleanupRegistry {
    path: PathBuf,
    entries: Mutex<BTreeMap<InstanceUuid, CleanupEntry>>,
}

impl CleanupRegistry {
    /// Open the ledger at `path`.
    ///
    /// A missing or unreadable file loads as an empty ledger; a stale ledger
    /// must never block allocation.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Vec<CleanupEntry>>(&bytes) {
                Ok(list) => list.into_iter().map(|e| (e.uuid, e)).collect(),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Cleanup ledger unreadable, starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Record an instance for forced teardown. At most once per instance;
    /// re-registering an already tracked uuid keeps the original entry.
    pub async fn allocate_device(
        &self,
        uuid: InstanceUuid,
        name: &str,
    ) -> Result<(), CleanupError> {
        let mut entries = self.entries.lock().await;

        entries.entry(uuid).or_insert_with(|| CleanupEntry {
            uuid,
            name: name.to_string(),
            registered_at: Utc::now(),
        });

        trace!(uuid = %uuid, name = %name, "Instance registered for forced teardown");
        self.persist(&entries).await
    }

    /// Remove an instance from the forced-teardown set.
    pub async fn dispose_device(&self, uuid: &InstanceUuid) -> Result<(), CleanupError> {
        let mut entries = self.entries.lock().await;

        if entries.remove(uuid).is_none() {
            return Ok(());
        }

        trace!(uuid = %uuid, "Instance removed from forced-teardown set");
        self.persist(&entries).await
    }

    /// Snapshot of the instances currently awaiting forced teardown.
    pub async fn registered(&self) -> Vec<CleanupEntry> {
        self.entries.lock().await.values().cloned().collect()
    }

    async fn persist(
        &self,
        entries: &BTreeMap<InstanceUuid, CleanupEntry>,
    ) -> Result<(), CleanupError> {
        let list: Vec<&CleanupEntry> = entries.values().collect();
        let bytes = serde_json::to_vec_pretty(&list)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, bytes).await?;

        Ok(())
    }
}
