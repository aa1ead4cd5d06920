// ## File: `src/stream/core.rs`
// ## Public operations: validate, open, run

use std::io::Write;

use tracing::warn;

use crate::{
    constants::{AES_BLOCK_SIZE, MAX_CHUNK_SIZE},
    crypto::{CipherKey, CtrTransform},
    stream::{
        io::{open_input, open_output, open_outputs, InputSource, OutputSink},
        pipeline::{run_pipeline, DirectWriter, PipelineConfig},
        splitter::ChunkSplitter,
    },
    telemetry::{Stage, TelemetrySnapshot, TelemetryTimer},
    types::{CipherError, Direction},
};

/// Encrypt `input` into `output` with AES-256-CTR.
pub fn encrypt(
    input: InputSource,
    output: OutputSink,
    key: &CipherKey,
    iv: &[u8],
) -> Result<TelemetrySnapshot, CipherError> {
    transform_stream(Direction::Encrypt, input, output, key, iv, &PipelineConfig::default())
}

/// Decrypt `input` into `output`. Same keystream as `encrypt`.
pub fn decrypt(
    input: InputSource,
    output: OutputSink,
    key: &CipherKey,
    iv: &[u8],
) -> Result<TelemetrySnapshot, CipherError> {
    transform_stream(Direction::Decrypt, input, output, key, iv, &PipelineConfig::default())
}

/// Encrypt `input` and spread the ciphertext over `outputs`, `chunk_size`
/// bytes per sink, the last written sink taking the remainder.
pub fn encrypt_to_chunks(
    input: InputSource,
    outputs: Vec<OutputSink>,
    key: &CipherKey,
    iv: &[u8],
    chunk_size: i64,
) -> Result<TelemetrySnapshot, CipherError> {
    encrypt_to_chunks_with_config(input, outputs, key, iv, chunk_size, &PipelineConfig::default())
}

/// Single-sink run in either direction.
pub fn transform_stream(
    direction: Direction,
    input: InputSource,
    output: OutputSink,
    key: &CipherKey,
    iv: &[u8],
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, CipherError> {
    let mut timer = TelemetryTimer::new();
    timer
        .time(Stage::Validate, || validate_stream_params(iv, config))
        .inspect_err(|e| log_rejected(direction, e))?;

    let (mut reader, writer) = timer.time(Stage::Open, || {
        let reader = open_input(input)?;
        let writer = open_output(output)?;
        Ok::<_, CipherError>((reader, writer))
    })
    .inspect_err(|e| log_open_failed(direction, e))?;

    let mut transform =
        CtrTransform::init(direction, key, iv).inspect_err(|e| log_open_failed(direction, e))?;
    let mut writer = DirectWriter::new(writer);

    run_pipeline(direction, &mut reader, &mut transform, &mut writer, config, &mut timer)
}

pub fn encrypt_to_chunks_with_config(
    input: InputSource,
    outputs: Vec<OutputSink>,
    key: &CipherKey,
    iv: &[u8],
    chunk_size: i64,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, CipherError> {
    let direction = Direction::Encrypt;
    let mut timer = TelemetryTimer::new();
    let chunk_size = timer
        .time(Stage::Validate, || validate_chunk_params(iv, chunk_size, outputs.len(), config))
        .inspect_err(|e| log_rejected(direction, e))?;

    let (mut reader, sinks) = timer.time(Stage::Open, || {
        let reader = open_input(input)?;
        let sinks: Vec<Box<dyn Write + Send>> = open_outputs(outputs)?;
        Ok::<_, CipherError>((reader, sinks))
    })
    .inspect_err(|e| log_open_failed(direction, e))?;

    let mut transform =
        CtrTransform::init(direction, key, iv).inspect_err(|e| log_open_failed(direction, e))?;
    let mut splitter = ChunkSplitter::new(sinks, chunk_size);

    run_pipeline(direction, &mut reader, &mut transform, &mut splitter, config, &mut timer)
}

// ============================================================
// Validation (runs before any source or sink is opened)
// ============================================================

pub fn validate_iv(iv: &[u8]) -> Result<(), CipherError> {
    if iv.len() != AES_BLOCK_SIZE {
        return Err(CipherError::BadIv {
            expected: AES_BLOCK_SIZE,
            actual: iv.len(),
        });
    }
    Ok(())
}

/// Accepts `1..=MAX_CHUNK_SIZE`, returning the size as an unsigned byte count.
pub fn validate_chunk_size(chunk_size: i64) -> Result<u64, CipherError> {
    if chunk_size <= 0 {
        return Err(CipherError::BadInput(format!(
            "chunk size must be greater than zero, got {chunk_size}"
        )));
    }
    if chunk_size > MAX_CHUNK_SIZE {
        return Err(CipherError::BadInput(format!(
            "chunk size {chunk_size} overflows byte accounting (max {MAX_CHUNK_SIZE})"
        )));
    }
    Ok(chunk_size as u64)
}

pub fn validate_stream_params(iv: &[u8], config: &PipelineConfig) -> Result<(), CipherError> {
    config.validate()?;
    validate_iv(iv)
}

pub fn validate_chunk_params(
    iv: &[u8],
    chunk_size: i64,
    sink_count: usize,
    config: &PipelineConfig,
) -> Result<u64, CipherError> {
    config.validate()?;
    let chunk_size = validate_chunk_size(chunk_size)?;
    validate_iv(iv)?;
    if sink_count == 0 {
        return Err(CipherError::FileCreationFailed(
            "no output sinks supplied for chunked encryption".into(),
        ));
    }
    Ok(chunk_size)
}

fn log_rejected(direction: Direction, e: &CipherError) {
    warn!(%direction, kind = %e.kind(), "[VALIDATE] rejected before I/O: {e}");
}

fn log_open_failed(direction: Direction, e: &CipherError) {
    warn!(%direction, kind = %e.kind(), "[OPEN] could not start pipeline: {e}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_BUFFER_SIZE;
    use crate::types::ErrorKind;

    #[test]
    fn chunk_size_bounds() {
        assert_eq!(validate_chunk_size(0).unwrap_err().kind(), ErrorKind::BadInput);
        assert_eq!(validate_chunk_size(-5).unwrap_err().kind(), ErrorKind::BadInput);
        assert_eq!(validate_chunk_size(i64::MAX).unwrap_err().kind(), ErrorKind::BadInput);
        assert_eq!(
            validate_chunk_size(i64::MAX - MAX_BUFFER_SIZE as i64 + 1).unwrap_err().kind(),
            ErrorKind::BadInput
        );
        assert_eq!(validate_chunk_size(MAX_CHUNK_SIZE).unwrap(), MAX_CHUNK_SIZE as u64);
        assert_eq!(validate_chunk_size(1).unwrap(), 1);
    }

    #[test]
    fn chunk_params_check_order() {
        let cfg = PipelineConfig::default();
        // chunk size is judged before the IV and the sink list
        let err = validate_chunk_params(&[0u8; 3], 0, 0, &cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadInput);
        let err = validate_chunk_params(&[0u8; 3], 10, 0, &cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadIv);
        let err = validate_chunk_params(&[0u8; 16], 10, 0, &cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileCreationFailed);
        assert_eq!(validate_chunk_params(&[0u8; 16], 10, 1, &cfg).unwrap(), 10);
    }

    #[test]
    fn iv_must_be_one_block() {
        assert!(validate_iv(&[0u8; 16]).is_ok());
        assert!(matches!(
            validate_iv(&[0u8; 12]),
            Err(CipherError::BadIv { expected: 16, actual: 12 })
        ));
    }
}
