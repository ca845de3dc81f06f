//! Event type definitions for device lifecycle events.
//!
//! Each event type has a corresponding payload struct carrying the
//! event-specific data in its wire field names.

use serde::{Deserialize, Serialize};

// =============================================================================
// Event Type Constants
// =============================================================================

/// All event type names as constants.
pub mod event_types {
    pub const BOOT_DEVICE: &str = "bootDevice";
    pub const BEFORE_SHUTDOWN_DEVICE: &str = "beforeShutdownDevice";
    pub const SHUTDOWN_DEVICE: &str = "shutdownDevice";
}

// =============================================================================
// Payloads
// =============================================================================

/// Payload for `bootDevice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootDevicePayload {
    /// True when the device was freshly provisioned rather than reused.
    #[serde(rename = "coldBoot")]
    pub cold_boot: bool,

    /// The device's connection address.
    #[serde(rename = "deviceId")]
    pub device_id: String,

    /// Display name of the recipe the device was allocated for.
    #[serde(rename = "type")]
    pub device_type: String,
}

/// Payload for `beforeShutdownDevice` and `shutdownDevice`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutdownDevicePayload {
    /// The device's connection address.
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

// =============================================================================
// Events
// =============================================================================

/// A device lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device finished allocation and is ready for use.
    BootDevice(BootDevicePayload),

    /// A device is about to be torn down.
    BeforeShutdownDevice(ShutdownDevicePayload),

    /// A device was torn down.
    ShutdownDevice(ShutdownDevicePayload),
}

impl DeviceEvent {
    /// The wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceEvent::BootDevice(_) => event_types::BOOT_DEVICE,
            DeviceEvent::BeforeShutdownDevice(_) => event_types::BEFORE_SHUTDOWN_DEVICE,
            DeviceEvent::ShutdownDevice(_) => event_types::SHUTDOWN_DEVICE,
        }
    }

    /// The payload serialized to its wire form.
    pub fn payload_json(&self) -> Result<serde_json::Value, crate::EventError> {
        let value = match self {
            DeviceEvent::BootDevice(p) => serde_json::to_value(p)?,
            DeviceEvent::BeforeShutdownDevice(p) => serde_json::to_value(p)?,
            DeviceEvent::ShutdownDevice(p) => serde_json::to_value(p)?,
        };
        Ok(value)
    }
}
