//! Allocation coordinator: turns a recipe into a ready device and back.
//!
//! ## Allocation
//!
//! ```text
//! find free -> exclusive region -> cleanup ledger -> readiness wait -> adb connect -> bootDevice
//!              (claim decision:    (new instances)   (unless online)   (unless
//!               reuse or create)                                        connected)
//! ```
//!
//! The exclusive region contains the claim decision and nothing else; at
//! most a create call happens inside it. Connecting the device and waiting
//! for it to come online are slow and run strictly after the region closes,
//! so concurrent allocators are never starved behind provisioning work.
//!
//! ## Deallocation
//!
//! delete -> ledger dispose -> claim release -> teardown events.
//! A failed delete skips everything after it.

use std::sync::Arc;

use droidfarm_events::{BootDevicePayload, DeviceEvent, Emitter, ShutdownDevicePayload};
use droidfarm_id::InstanceUuid;
use droidfarm_retry::RetryPolicy;
use tracing::debug;

use crate::cleanup::CleanupRegistry;
use crate::cloud::{CloudError, InstanceLifecycle, InstanceLookup};
use crate::device::{DeviceInstance, Recipe};
use crate::error::AllocationError;
use crate::readiness::wait_until_online;
use crate::registry::{DeviceClaim, DeviceRegistry};

/// The claim decided inside the exclusive region.
struct Allocation {
    instance: DeviceInstance,
    cold_boot: bool,
}

impl DeviceClaim for Allocation {
    fn device_id(&self) -> InstanceUuid {
        self.instance.uuid
    }
}

/// Orchestrates the cloud services, registries, and emitter to implement
/// device allocation and deallocation.
pub struct AllocationCoordinator<L, C> {
    lookup: Arc<L>,
    lifecycle: Arc<C>,
    registry: Arc<DeviceRegistry>,
    cleanup: Arc<CleanupRegistry>,
    emitter: Arc<Emitter>,
    readiness: RetryPolicy,
}

impl<L, C> AllocationCoordinator<L, C>
where
    L: InstanceLookup,
    C: InstanceLifecycle,
{
    pub fn new(
        lookup: Arc<L>,
        lifecycle: Arc<C>,
        registry: Arc<DeviceRegistry>,
        cleanup: Arc<CleanupRegistry>,
        emitter: Arc<Emitter>,
        readiness: RetryPolicy,
    ) -> Self {
        Self {
            lookup,
            lifecycle,
            registry,
            cleanup,
            emitter,
            readiness,
        }
    }

    /// Allocate a ready device for `recipe`.
    ///
    /// Reuses a free instance when the cloud has one, provisions a new one
    /// otherwise. The returned instance is always online with a live
    /// device-control channel.
    pub async fn allocate_device(
        &self,
        recipe: &Recipe,
    ) -> Result<DeviceInstance, AllocationError> {
        debug!(
            event = "ALLOCATE_DEVICE",
            "Trying to allocate a device for recipe {recipe}"
        );

        let free = self.lookup.find_free_instance(recipe).await?;

        let Allocation {
            instance,
            cold_boot,
        } = self
            .registry
            .allocate_device(|| async move {
                match free {
                    Some(instance) => Ok::<_, CloudError>(Allocation {
                        instance,
                        cold_boot: false,
                    }),
                    None => {
                        let instance = self.lifecycle.create_instance(recipe.uuid).await?;
                        Ok(Allocation {
                            instance,
                            cold_boot: true,
                        })
                    }
                }
            })
            .await?;

        // New instances join the forced-teardown ledger before the readiness
        // wait; an unclean exit mid-boot still gets reaped.
        if cold_boot {
            self.cleanup
                .allocate_device(instance.uuid, &instance.name)
                .await?;
        }

        let instance = if instance.is_online {
            instance
        } else {
            wait_until_online(self.lookup.as_ref(), instance.uuid, &self.readiness).await?
        };

        let instance = if instance.is_adb_connected {
            instance
        } else {
            self.lifecycle.adb_connect_instance(instance.uuid).await?
        };

        debug!(event = "ALLOCATE_DEVICE", "Settled on {instance}");

        self.emitter
            .emit(DeviceEvent::BootDevice(BootDevicePayload {
                cold_boot,
                device_id: instance.adb_name.clone(),
                device_type: recipe.name.clone(),
            }))
            .await?;

        Ok(instance)
    }

    /// Tear down a previously allocated instance.
    ///
    /// Returns normally only if deletion succeeded. Order is fixed:
    /// delete, ledger dispose, claim release, then the teardown events.
    pub async fn deallocate_device(
        &self,
        instance: &DeviceInstance,
    ) -> Result<(), AllocationError> {
        self.lifecycle.delete_instance(instance.uuid).await?;

        self.cleanup.dispose_device(&instance.uuid).await?;
        self.registry.release_device(&instance.uuid).await;

        self.emitter
            .emit(DeviceEvent::BeforeShutdownDevice(ShutdownDevicePayload {
                device_id: instance.adb_name.clone(),
            }))
            .await?;
        self.emitter
            .emit(DeviceEvent::ShutdownDevice(ShutdownDevicePayload {
                device_id: instance.adb_name.clone(),
            }))
            .await?;

        Ok(())
    }
}
