//! Readiness wait: poll an instance until its control plane reports online.

use droidfarm_id::InstanceUuid;
use droidfarm_retry::{retry, RetryPolicy};
use tracing::trace;

use crate::cloud::InstanceLookup;
use crate::device::DeviceInstance;
use crate::error::AllocationError;

enum WaitError {
    NotOnline,
    Fetch,
}

/// Re-fetch `uuid` until it reports online, bounded by `policy`.
///
/// Every attempt fetches fresh state by uuid; the copy the caller started
/// from is never trusted once the wait begins. Exhaustion maps to
/// [`AllocationError::ReadinessTimeout`] naming the instance. Callers must
/// not enter the wait when the instance is already online.
pub(crate) async fn wait_until_online<L>(
    lookup: &L,
    uuid: InstanceUuid,
    policy: &RetryPolicy,
) -> Result<DeviceInstance, AllocationError>
where
    L: InstanceLookup + ?Sized,
{
    retry(policy, || async move {
        match lookup.get_instance(uuid).await {
            Ok(instance) if instance.is_online => Ok(instance),
            Ok(_) => {
                trace!(uuid = %uuid, "Instance not online yet");
                Err(WaitError::NotOnline)
            }
            Err(e) => {
                trace!(uuid = %uuid, error = %e, "State fetch failed");
                Err(WaitError::Fetch)
            }
        }
    })
    .await
    .map_err(|_| AllocationError::ReadinessTimeout { uuid })
}
