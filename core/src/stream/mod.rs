//! stream: buffered AES-CTR streaming with single-sink and chunked output.
//!
//! Layering: `core` validates and opens, `pipeline` drives the loop,
//! `splitter` owns chunk accounting, `io` normalizes sources and sinks.

pub mod io;
pub mod pipeline;
pub mod splitter;
pub mod core;

pub use io::{InputSource, OutputSink, SharedBuffer};
pub use pipeline::{PipelineConfig, TransformedWriter};
pub use splitter::{split_chunk, ChunkSplitter, ChunkWriteState};

pub use self::core::{
    decrypt,
    encrypt,
    encrypt_to_chunks,
    encrypt_to_chunks_with_config,
    transform_stream,
};
