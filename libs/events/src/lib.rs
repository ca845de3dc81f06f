//! # droidfarm-events
//!
//! Device lifecycle event definitions and emission for the droidfarm
//! platform.
//!
//! ## Design Principles
//!
//! - Events are immutable records of device lifecycle transitions
//! - Payload field names are wire-format (camelCase), matching what
//!   downstream subscribers parse
//! - Emission is fallible: a subscriber rejecting an event fails the
//!   emitting operation
//!
//! ## Event Types
//!
//! - `bootDevice`: a device finished allocation and is ready
//! - `beforeShutdownDevice`: a device is about to be torn down
//! - `shutdownDevice`: a device was torn down

mod emitter;
mod error;
mod types;

pub use emitter::{Emitter, EventSubscriber};
pub use error::EventError;
pub use types::*;
