//! crypto/types.rs
//! Key material for the counter-mode transform.
//!
//! Keys and IVs travel out of band as hex strings; these helpers are the only
//! place that format is parsed. Key bytes are never printed.

use std::fmt;

use crate::constants::KEY_LEN_32;
use crate::types::CipherError;

/// AES-256 key, owned by the operation that uses it.
#[derive(Clone, PartialEq, Eq)]
pub struct CipherKey([u8; KEY_LEN_32]);

impl CipherKey {
    pub fn new(bytes: [u8; KEY_LEN_32]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CipherError> {
        let arr: [u8; KEY_LEN_32] = bytes.try_into().map_err(|_| {
            CipherError::BadInput(format!(
                "invalid key length: expected={}, actual={}",
                KEY_LEN_32,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Parse a 64-character hex key.
    pub fn from_hex(hex_key: &str) -> Result<Self, CipherError> {
        let bytes = hex::decode(hex_key.trim())
            .map_err(|e| CipherError::BadInput(format!("invalid hex key: {e}")))?;
        Self::from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN_32] {
        &self.0
    }
}

impl From<[u8; KEY_LEN_32]> for CipherKey {
    fn from(bytes: [u8; KEY_LEN_32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherKey(<redacted>)")
    }
}

/// Parse a hex IV. The length is checked later, by operation validation,
/// so a short IV still surfaces as `BadIv` rather than a parse error.
pub fn iv_from_hex(hex_iv: &str) -> Result<Vec<u8>, CipherError> {
    hex::decode(hex_iv.trim()).map_err(|_| CipherError::BadIv {
        expected: crate::constants::AES_BLOCK_SIZE,
        actual: hex_iv.trim().len() / 2,
    })
}

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
