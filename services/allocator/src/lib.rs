//! droidfarm Allocator Library
//!
//! The allocator turns a test-run recipe into a ready-to-use, network
//! reachable cloud device instance, reusing idle instances when possible and
//! provisioning new ones otherwise. When a caller is done with a device, the
//! allocator tears it down again.
//!
//! ## Architecture
//!
//! ```text
//! AllocationCoordinator
//! ├── InstanceLookup      (free-instance queries, state refresh)
//! ├── InstanceLifecycle   (create / adb-connect / delete)
//! ├── DeviceRegistry      (exclusive region committing claims)
//! ├── CleanupRegistry     (forced-teardown ledger)
//! └── Emitter             (bootDevice / shutdownDevice fan-out)
//! ```
//!
//! The exclusive region is the only point serialized across concurrent
//! allocations and contains nothing but the claim decision; connecting a
//! device and waiting for it to come online always happen after the region
//! closes.
//!
//! ## Modules
//!
//! - `cloud`: Device cloud service interfaces
//! - `registry`: In-use tracking and the exclusive region
//! - `cleanup`: Forced-teardown ledger
//! - `coordinator`: The allocation / deallocation algorithms

pub mod cleanup;
pub mod cloud;
pub mod config;
pub mod coordinator;
pub mod device;
pub mod error;
pub mod mock;
pub mod registry;

mod readiness;

// Re-export commonly used types
pub use cloud::{CloudError, InstanceLifecycle, InstanceLookup};
pub use coordinator::AllocationCoordinator;
pub use device::{DeviceInstance, Recipe};
pub use error::AllocationError;
pub use mock::MockDeviceCloud;
