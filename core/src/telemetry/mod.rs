//! telemetry/mod.rs
//! Counters, stage timers, and the immutable snapshot returned on success.
//!
//! The snapshot is the success status of every operation: what was read,
//! what was written and where, and where the keystream stopped.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
