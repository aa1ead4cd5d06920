// ## File: `src/stream/pipeline.rs`
// ## Buffered read -> transform -> write loop (no validation, no opening)

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{BUFFER_SIZE, MAX_BUFFER_SIZE};
use crate::crypto::StreamTransform;
use crate::stream::io::read_some;
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::{CipherError, Direction};

/// Pipeline tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Working buffer capacity, reused across reads.
    pub buffer_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { buffer_size: BUFFER_SIZE }
    }
}

impl PipelineConfig {
    pub fn new(buffer_size: usize) -> Self {
        Self { buffer_size }
    }

    pub fn validate(&self) -> Result<(), CipherError> {
        if self.buffer_size == 0 || self.buffer_size > MAX_BUFFER_SIZE {
            return Err(CipherError::BadInput(format!(
                "invalid buffer size: {}, must be within 1..={MAX_BUFFER_SIZE}",
                self.buffer_size
            )));
        }
        Ok(())
    }
}

/// Destination of transformed bytes: one sink, or a chunk splitter.
pub trait TransformedWriter {
    fn write_transformed(&mut self, data: &[u8]) -> Result<(), CipherError>;

    /// Flush every sink still open. Called once, on success only; on failure
    /// the sinks are released by `Drop`.
    fn close(&mut self) -> Result<(), CipherError>;

    fn bytes_written(&self) -> u64;

    fn chunk_lengths(&self) -> Vec<u64>;
}

/// Single-sink writer.
pub struct DirectWriter<W: Write> {
    out: W,
    written: u64,
}

impl<W: Write> DirectWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TransformedWriter for DirectWriter<W> {
    fn write_transformed(&mut self, data: &[u8]) -> Result<(), CipherError> {
        self.out
            .write_all(data)
            .map_err(|e| CipherError::write_failed(0, e))?;
        self.written += data.len() as u64;
        Ok(())
    }

    fn close(&mut self) -> Result<(), CipherError> {
        self.out.flush().map_err(|e| CipherError::write_failed(0, e))
    }

    fn bytes_written(&self) -> u64 {
        self.written
    }

    fn chunk_lengths(&self) -> Vec<u64> {
        if self.written > 0 {
            vec![self.written]
        } else {
            Vec::new()
        }
    }
}

// ============================================================
// Pipeline loop
// ============================================================
pub fn run_pipeline<R, T, W>(
    direction: Direction,
    reader: &mut R,
    transform: &mut T,
    writer: &mut W,
    config: &PipelineConfig,
    timer: &mut TelemetryTimer,
) -> Result<TelemetrySnapshot, CipherError>
where
    R: Read + ?Sized,
    T: StreamTransform,
    W: TransformedWriter,
{
    let mut counters = TelemetryCounters::default();
    let mut buf = vec![0u8; config.buffer_size];
    debug!(%direction, buffer_size = config.buffer_size, "[PIPELINE] start");

    let result = (|| -> Result<(), CipherError> {
        loop {
            let n = timer.time(Stage::Read, || read_some(&mut *reader, &mut buf))?;
            if n == 0 {
                break;
            }
            counters.add_read(n);

            let produced = timer.time(Stage::Transform, || transform.update(&mut buf[..n]))?;
            if produced > 0 {
                timer.time(Stage::Write, || writer.write_transformed(&buf[..produced]))?;
                counters.add_transformed(produced);
            }
        }

        let trailing = timer.time(Stage::Finalize, || transform.finalize())?;
        if !trailing.is_empty() {
            timer.time(Stage::Write, || writer.write_transformed(&trailing))?;
            counters.add_finalized(trailing.len());
        }

        timer.time(Stage::Close, || writer.close())
    })();

    if let Err(e) = result {
        warn!(
            %direction,
            kind = %e.kind(),
            bytes_read = counters.bytes_read,
            bytes_written = writer.bytes_written(),
            "[PIPELINE] aborted: {e}"
        );
        return Err(e);
    }

    timer.finish();
    debug!(
        %direction,
        bytes_read = counters.bytes_read,
        bytes_written = counters.bytes_written,
        transform_us = timer.stage_times.get(Stage::Transform).as_micros() as u64,
        "[PIPELINE] finished"
    );

    Ok(TelemetrySnapshot::from(
        direction,
        &counters,
        timer,
        transform.keystream_offset(),
        writer.chunk_lengths(),
    ))
}
