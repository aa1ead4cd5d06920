//! scheduler/job.rs
//! A self-contained unit of work: everything one pipeline run needs, owned.

use crate::crypto::CipherKey;
use crate::stream::core::{encrypt_to_chunks_with_config, transform_stream};
use crate::stream::{InputSource, OutputSink, PipelineConfig};
use crate::telemetry::TelemetrySnapshot;
use crate::types::{CipherError, Direction};

pub enum CipherJob {
    Encrypt {
        input: InputSource,
        output: OutputSink,
        key: CipherKey,
        iv: Vec<u8>,
    },
    Decrypt {
        input: InputSource,
        output: OutputSink,
        key: CipherKey,
        iv: Vec<u8>,
    },
    EncryptToChunks {
        input: InputSource,
        outputs: Vec<OutputSink>,
        key: CipherKey,
        iv: Vec<u8>,
        chunk_size: i64,
    },
}

impl CipherJob {
    pub fn direction(&self) -> Direction {
        match self {
            CipherJob::Encrypt { .. } | CipherJob::EncryptToChunks { .. } => Direction::Encrypt,
            CipherJob::Decrypt { .. } => Direction::Decrypt,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CipherJob::Encrypt { .. } => "encrypt",
            CipherJob::Decrypt { .. } => "decrypt",
            CipherJob::EncryptToChunks { .. } => "encrypt_to_chunks",
        }
    }

    /// Run to completion on the current thread.
    pub fn run(self, config: &PipelineConfig) -> Result<TelemetrySnapshot, CipherError> {
        match self {
            CipherJob::Encrypt { input, output, key, iv } => {
                transform_stream(Direction::Encrypt, input, output, &key, &iv, config)
            }
            CipherJob::Decrypt { input, output, key, iv } => {
                transform_stream(Direction::Decrypt, input, output, &key, &iv, config)
            }
            CipherJob::EncryptToChunks { input, outputs, key, iv, chunk_size } => {
                encrypt_to_chunks_with_config(input, outputs, &key, &iv, chunk_size, config)
            }
        }
    }
}
