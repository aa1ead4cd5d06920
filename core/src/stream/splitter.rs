// ## File: `src/stream/splitter.rs`
// ## Chunk splitter: fan a transformed stream out over ordered sinks

use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::stream::pipeline::TransformedWriter;
use crate::types::CipherError;

/// Accounting for one chunked run.
///
/// Invariants:
/// - `written_in_chunk <= chunk_size`; when equal the sink index has
///   already advanced and `written_in_chunk` is back to 0.
/// - `current_sink` and `total_bytes` never decrease.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkWriteState {
    pub current_sink: usize,
    pub written_in_chunk: u64,
    pub total_bytes: u64,
}

impl ChunkWriteState {
    /// Lengths of every chunk written so far, in sink order.
    /// Sinks that never received a byte are not listed.
    pub fn chunk_lengths(&self, chunk_size: u64) -> Vec<u64> {
        let mut lengths = vec![chunk_size; self.current_sink];
        if self.written_in_chunk > 0 {
            lengths.push(self.written_in_chunk);
        }
        lengths
    }
}

/// Distribute `data` over `sinks` starting from `state`, honoring `chunk_size`.
///
/// Returns the advanced state. Running out of sinks with bytes left is a
/// `WriteFailed`, mid-stream or at finalize alike.
pub fn split_chunk<W: Write>(
    mut state: ChunkWriteState,
    data: &[u8],
    sinks: &mut [W],
    chunk_size: u64,
) -> Result<ChunkWriteState, CipherError> {
    debug_assert!(chunk_size > 0);
    let sink_count = sinks.len();
    let mut offset = 0usize;

    while offset < data.len() {
        let remaining = data.len() - offset;
        let Some(sink) = sinks.get_mut(state.current_sink) else {
            warn!(
                sink = state.current_sink,
                remaining, "[SPLITTER] sinks exhausted with bytes left"
            );
            return Err(CipherError::write_failed(
                state.current_sink,
                io::Error::other(format!(
                    "no sink left for {remaining} transformed bytes ({sink_count} sinks supplied)"
                )),
            ));
        };

        let space_left = chunk_size - state.written_in_chunk;
        let to_write = usize::try_from(space_left).map_or(remaining, |s| s.min(remaining));

        sink.write_all(&data[offset..offset + to_write])
            .map_err(|e| CipherError::write_failed(state.current_sink, e))?;

        offset += to_write;
        state.written_in_chunk += to_write as u64;
        state.total_bytes += to_write as u64;

        if state.written_in_chunk == chunk_size {
            sink.flush()
                .map_err(|e| CipherError::write_failed(state.current_sink, e))?;
            trace!(sink = state.current_sink, chunk_size, "[SPLITTER] chunk complete");
            state.current_sink += 1;
            state.written_in_chunk = 0;
        }
    }

    Ok(state)
}

/// Multi-sink writer for chunked mode.
pub struct ChunkSplitter<W: Write> {
    sinks: Vec<W>,
    chunk_size: u64,
    state: ChunkWriteState,
}

impl<W: Write> ChunkSplitter<W> {
    pub fn new(sinks: Vec<W>, chunk_size: u64) -> Self {
        Self {
            sinks,
            chunk_size,
            state: ChunkWriteState::default(),
        }
    }
}

impl<W: Write> TransformedWriter for ChunkSplitter<W> {
    fn write_transformed(&mut self, data: &[u8]) -> Result<(), CipherError> {
        self.state = split_chunk(self.state, data, &mut self.sinks, self.chunk_size)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), CipherError> {
        for (i, sink) in self.sinks.iter_mut().enumerate().skip(self.state.current_sink) {
            sink.flush().map_err(|e| CipherError::write_failed(i, e))?;
        }
        Ok(())
    }

    fn bytes_written(&self) -> u64 {
        self.state.total_bytes
    }

    fn chunk_lengths(&self) -> Vec<u64> {
        self.state.chunk_lengths(self.chunk_size)
    }
}
