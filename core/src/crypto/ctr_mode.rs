//! crypto/ctr_mode.rs
//! AES-256 counter-mode transform.
//!
//! Design notes:
//! - 128-bit big-endian counter, IV is the initial counter block.
//! - Encrypt and decrypt apply the identical keystream; `Direction` is a label.
//! - Output length always equals input length. `finalize` exists for the
//!   contract (some primitives buffer a block) and yields no bytes here.

use aes::cipher::{KeyIvInit, StreamCipher};

use crate::constants::AES_BLOCK_SIZE;
use crate::crypto::types::CipherKey;
use crate::types::{CipherError, Direction};

type Aes256Ctr = ::ctr::Ctr128BE<aes::Aes256>;

/// Byte-stream transform driven by the pipeline loop.
pub trait StreamTransform {
    /// Transform `buf` in place, returning the number of output bytes.
    fn update(&mut self, buf: &mut [u8]) -> Result<usize, CipherError>;

    /// Flush any buffered partial block. Further updates fail.
    fn finalize(&mut self) -> Result<Vec<u8>, CipherError>;

    /// Keystream position in bytes, i.e. the status of the last step.
    fn keystream_offset(&self) -> u64;
}

pub struct CtrTransform {
    direction: Direction,
    cipher: Aes256Ctr,
    processed: u64,
    finalized: bool,
}

impl CtrTransform {
    pub fn init(direction: Direction, key: &CipherKey, iv: &[u8]) -> Result<Self, CipherError> {
        if iv.len() != AES_BLOCK_SIZE {
            return Err(CipherError::BadIv {
                expected: AES_BLOCK_SIZE,
                actual: iv.len(),
            });
        }
        let cipher = Aes256Ctr::new_from_slices(key.as_bytes(), iv)
            .map_err(|e| CipherError::TransformFailed(format!("cipher init: {e}")))?;

        Ok(Self {
            direction,
            cipher,
            processed: 0,
            finalized: false,
        })
    }
}

impl StreamTransform for CtrTransform {
    fn update(&mut self, buf: &mut [u8]) -> Result<usize, CipherError> {
        if self.finalized {
            return Err(CipherError::TransformFailed(format!(
                "{} update after finalize",
                self.direction
            )));
        }
        self.cipher
            .try_apply_keystream(buf)
            .map_err(|e| CipherError::TransformFailed(format!("{} update: {e}", self.direction)))?;
        self.processed += buf.len() as u64;
        Ok(buf.len())
    }

    fn finalize(&mut self) -> Result<Vec<u8>, CipherError> {
        if self.finalized {
            return Err(CipherError::TransformFailed(format!(
                "{} finalized twice",
                self.direction
            )));
        }
        self.finalized = true;
        Ok(Vec::new())
    }

    fn keystream_offset(&self) -> u64 {
        self.processed
    }
}
