//! Error taxonomy for allocation and deallocation.

use droidfarm_events::EventError;
use droidfarm_id::InstanceUuid;
use thiserror::Error;

use crate::cleanup::CleanupError;
use crate::cloud::CloudError;

/// Errors surfaced by [`crate::AllocationCoordinator`].
///
/// None of these are recovered locally: any failure aborts the remaining
/// steps of the call it occurred in.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// The readiness wait exhausted its retry policy.
    #[error("timeout waiting for instance {uuid} to be ready")]
    ReadinessTimeout { uuid: InstanceUuid },

    /// A device cloud operation failed; propagated with no coordinator-level
    /// retry.
    #[error(transparent)]
    Cloud(#[from] CloudError),

    /// The forced-teardown ledger could not be updated.
    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    /// Event emission was rejected downstream. Logging already performed is
    /// not undone.
    #[error(transparent)]
    Emit(#[from] EventError),
}

impl AllocationError {
    /// Returns true for a readiness-wait timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, AllocationError::ReadinessTimeout { .. })
    }
}
