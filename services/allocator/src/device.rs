//! Device cloud value types.

use droidfarm_id::{InstanceUuid, RecipeUuid};
use serde::{Deserialize, Serialize};

/// A test-run recipe: which device image/template to provision.
///
/// Produced by the caller; the allocator never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Device image/template to provision instances from.
    pub uuid: RecipeUuid,

    /// Display name used in logs and events.
    pub name: String,

    /// Human-readable description.
    pub description: String,
}

impl Recipe {
    pub fn new(uuid: RecipeUuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for Recipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.uuid)
    }
}

/// One cloud device instance.
///
/// Instances are owned by the cloud services; the allocator holds only
/// transient references returned from those services within a single call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInstance {
    /// Stable identity, assigned at creation.
    pub uuid: InstanceUuid,

    /// Display name.
    pub name: String,

    /// Network endpoint string; a placeholder until a connection exists.
    pub adb_name: String,

    /// The control plane reports the instance booted.
    pub is_online: bool,

    /// A live device-control channel is attached.
    pub is_adb_connected: bool,
}

impl DeviceInstance {
    /// Online with a live device-control channel.
    pub fn is_ready(&self) -> bool {
        self.is_online && self.is_adb_connected
    }
}

impl std::fmt::Display for DeviceInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.uuid)
    }
}
