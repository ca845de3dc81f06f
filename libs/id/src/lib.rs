//! # droidfarm-id
//!
//! Typed identifier wrappers for the droidfarm platform.
//!
//! ## Design Principles
//!
//! - Instance and recipe identity is assigned by the device cloud; the
//!   platform never invents it (except in mocks)
//! - All IDs have a canonical string representation with strict parsing
//! - IDs support roundtrip serialization (parse → format → parse)
//! - IDs are typed to prevent mixing different resource types
//!
//! ## ID Format
//!
//! All IDs are plain hyphenated UUIDs, exactly as the cloud control plane
//! hands them out:
//!
//! - `7f2c1a9e-4b2d-4c6f-9a3e-1d8b6c2f0e57`
//!
//! The wrappers exist purely for type safety: an [`InstanceUuid`] can never
//! be passed where a [`RecipeUuid`] is expected.

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export uuid for consumers that need raw UUID operations
pub use uuid::Uuid;
