//! telemetry/counters.rs
//! Mutable counters used during one pipeline run.
//!
//! Converted into an immutable TelemetrySnapshot at pipeline end.
use serde::{Deserialize, Serialize};

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub reads: u64,
    pub bytes_read: u64,
    pub bytes_transformed: u64,
    pub bytes_written: u64,
    pub bytes_finalized: u64,
}

impl TelemetryCounters {
    /// Record one non-empty read from the source.
    pub fn add_read(&mut self, n: usize) {
        self.reads += 1;
        self.bytes_read += n as u64;
    }

    /// Record bytes produced by `update` and handed to the writer.
    pub fn add_transformed(&mut self, n: usize) {
        self.bytes_transformed += n as u64;
        self.bytes_written += n as u64;
    }

    /// Record trailing bytes produced by `finalize` and handed to the writer.
    pub fn add_finalized(&mut self, n: usize) {
        self.bytes_finalized += n as u64;
        self.bytes_written += n as u64;
    }
}
