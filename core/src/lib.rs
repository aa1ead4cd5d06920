//! ctrcrypt-core
//!
//! Pure Rust streaming AES-256-CTR engine.
//! Encrypts or decrypts arbitrarily large sources through a fixed working
//! buffer, optionally splitting the ciphertext across ordered, size-capped sinks.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod crypto;
pub mod telemetry;
pub mod scheduler;

// Stream layer
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::crypto::{iv_from_hex, to_hex, CipherKey};
    pub use crate::scheduler::{CipherJob, CipherQueue, CipherQueues, Completion, QueueConfig};
    pub use crate::stream::{
        decrypt, encrypt, encrypt_to_chunks, InputSource, OutputSink, PipelineConfig, SharedBuffer,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{CipherError, Direction, ErrorKind};
}
