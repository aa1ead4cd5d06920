//! telemetry/snapshot.rs
//! Immutable result of one successful pipeline run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};
use crate::types::Direction;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub direction: Direction,
    pub reads: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub bytes_finalized: u64,
    /// Keystream position after finalize (status of the last transform step).
    pub keystream_offset: u64,
    /// Chunk lengths in sink order. A single-sink run lists one entry,
    /// unless nothing was written.
    pub chunk_lengths: Vec<u64>,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(
        direction: Direction,
        counters: &TelemetryCounters,
        timer: &TelemetryTimer,
        keystream_offset: u64,
        chunk_lengths: Vec<u64>,
    ) -> Self {
        let elapsed = timer.elapsed();
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_read as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            direction,
            reads: counters.reads,
            bytes_read: counters.bytes_read,
            bytes_written: counters.bytes_written,
            bytes_finalized: counters.bytes_finalized,
            keystream_offset,
            chunk_lengths,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn chunks_used(&self) -> usize {
        self.chunk_lengths.len()
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal consistency:
    /// - CTR output length equals input length
    /// - chunk lengths sum to the bytes written
    /// - stage times fit inside the elapsed time
    pub fn sanity_check(&self) -> bool {
        self.bytes_written == self.bytes_read
            && self.keystream_offset == self.bytes_read
            && self.chunk_lengths.iter().sum::<u64>() == self.bytes_written
            && self.total_stage_time() <= self.elapsed
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
