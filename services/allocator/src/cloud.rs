//! Device cloud service interfaces.
//!
//! The cloud services abstract how instances are physically looked up,
//! created, connected, and deleted:
//! - `InstanceLookup` answers "is there a free instance?" and refreshes
//!   instance state
//! - `InstanceLifecycle` creates, connects, and deletes instances
//!
//! The transport behind them is opaque to the allocator. A mock
//! implementation of both is provided in [`crate::mock`] for testing and
//! development.

use async_trait::async_trait;
use droidfarm_id::{InstanceUuid, RecipeUuid};
use thiserror::Error;

use crate::device::{DeviceInstance, Recipe};

/// Errors surfaced by the device cloud services.
#[derive(Debug, Error)]
pub enum CloudError {
    /// The instance does not exist (or no longer exists).
    #[error("instance not found: {0}")]
    InstanceNotFound(InstanceUuid),

    /// The recipe does not exist.
    #[error("recipe not found: {0}")]
    RecipeNotFound(RecipeUuid),

    /// The cloud control plane rejected or failed the operation.
    #[error("device cloud error: {0}")]
    Api(String),
}

/// Queries instance state from the device cloud.
#[async_trait]
pub trait InstanceLookup: Send + Sync {
    /// Find an existing instance matching the recipe that no allocation
    /// currently claims.
    async fn find_free_instance(
        &self,
        recipe: &Recipe,
    ) -> Result<Option<DeviceInstance>, CloudError>;

    /// Re-fetch the current state of an instance.
    async fn get_instance(&self, uuid: InstanceUuid) -> Result<DeviceInstance, CloudError>;
}

/// Mutates instance lifecycle in the device cloud.
#[async_trait]
pub trait InstanceLifecycle: Send + Sync {
    /// Create a new instance from the given recipe.
    async fn create_instance(&self, recipe_uuid: RecipeUuid) -> Result<DeviceInstance, CloudError>;

    /// Attach a device-control channel; the returned instance carries the
    /// live connection address.
    async fn adb_connect_instance(
        &self,
        uuid: InstanceUuid,
    ) -> Result<DeviceInstance, CloudError>;

    /// Delete an instance.
    async fn delete_instance(&self, uuid: InstanceUuid) -> Result<(), CloudError>;
}
