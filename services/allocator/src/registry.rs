//! Device registry: in-use tracking and the exclusive region.
//!
//! The registry is the sole arbiter of which device identifiers are in use.
//! `allocate_device` serializes concurrent claim decisions: the callback it
//! runs decides which device to claim, and the returned claim is committed
//! into the in-use set atomically with the callback's completion, before the
//! region is released.
//!
//! The region must stay short. The callback's result is a plain value, so
//! connect and readiness polling cannot ride along inside it; they belong
//! strictly after the region closes.

use std::collections::HashSet;
use std::future::Future;

use droidfarm_id::InstanceUuid;
use tokio::sync::Mutex;
use tracing::trace;

/// A value that names the device it claims.
pub trait DeviceClaim {
    /// Identifier committed to the in-use set.
    fn device_id(&self) -> InstanceUuid;
}

impl DeviceClaim for InstanceUuid {
    fn device_id(&self) -> InstanceUuid {
        *self
    }
}

/// Serializes allocation so two callers cannot claim the same free instance.
#[derive(Default)]
pub struct DeviceRegistry {
    in_use: Mutex<HashSet<InstanceUuid>>,
}

impl DeviceRegistry {
    /// Create a registry with nothing in use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `decide` under the exclusive region and commit the claim it
    /// returns.
    ///
    /// The callback's only job is deciding which device identifier to claim.
    /// On success the claim is committed while the region is still held; a
    /// callback error commits nothing.
    pub async fn allocate_device<T, E, F, Fut>(&self, decide: F) -> Result<T, E>
    where
        T: DeviceClaim,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut in_use = self.in_use.lock().await;
        let claim = decide().await?;

        in_use.insert(claim.device_id());
        trace!(uuid = %claim.device_id(), "Claim committed");

        Ok(claim)
    }

    /// Release a previously committed claim.
    ///
    /// Returns false if the identifier was not in use.
    pub async fn release_device(&self, uuid: &InstanceUuid) -> bool {
        let released = self.in_use.lock().await.remove(uuid);
        if released {
            trace!(uuid = %uuid, "Claim released");
        }
        released
    }

    /// Whether an identifier is currently claimed.
    pub async fn is_in_use(&self, uuid: &InstanceUuid) -> bool {
        self.in_use.lock().await.contains(uuid)
    }

    /// Snapshot of the identifiers currently claimed.
    pub async fn in_use(&self) -> Vec<InstanceUuid> {
        let mut ids: Vec<_> = self.in_use.lock().await.iter().copied().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("decision failed")]
    struct DecisionFailed;

    #[tokio::test]
    async fn test_commits_claim_on_success() {
        let registry = DeviceRegistry::new();
        let uuid = InstanceUuid::new();

        let claimed: Result<InstanceUuid, DecisionFailed> =
            registry.allocate_device(|| async move { Ok(uuid) }).await;

        assert_eq!(claimed.unwrap(), uuid);
        assert!(registry.is_in_use(&uuid).await);
        assert_eq!(registry.in_use().await, vec![uuid]);
    }

    #[tokio::test]
    async fn test_commits_nothing_on_callback_error() {
        let registry = DeviceRegistry::new();

        let result: Result<InstanceUuid, DecisionFailed> = registry
            .allocate_device(|| async { Err(DecisionFailed) })
            .await;

        assert!(result.is_err());
        assert!(registry.in_use().await.is_empty());
    }

    #[tokio::test]
    async fn test_release_device() {
        let registry = DeviceRegistry::new();
        let uuid = InstanceUuid::new();

        let _: Result<InstanceUuid, DecisionFailed> =
            registry.allocate_device(|| async move { Ok(uuid) }).await;

        assert!(registry.release_device(&uuid).await);
        assert!(!registry.is_in_use(&uuid).await);
        assert!(!registry.release_device(&uuid).await);
    }

    #[tokio::test]
    async fn test_claim_decisions_never_overlap() {
        let registry = Arc::new(DeviceRegistry::new());
        let inside = Arc::new(AtomicBool::new(false));
        let overlaps = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let inside = Arc::clone(&inside);
            let overlaps = Arc::clone(&overlaps);

            handles.push(tokio::spawn(async move {
                let result: Result<InstanceUuid, DecisionFailed> = registry
                    .allocate_device(|| async move {
                        if inside.swap(true, Ordering::SeqCst) {
                            overlaps.fetch_add(1, Ordering::SeqCst);
                        }
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        inside.store(false, Ordering::SeqCst);
                        Ok(InstanceUuid::new())
                    })
                    .await;
                result.unwrap();
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert_eq!(registry.in_use().await.len(), 8);
    }
}
