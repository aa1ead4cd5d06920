use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error for every cipher operation.
/// - Exactly one variant per failure kind, no catch-all.
/// - Validation variants are raised before any source or sink is opened.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Chunk size, buffer size or key material rejected before any I/O.
    #[error("bad input: {0}")]
    BadInput(String),

    /// IV length differs from the cipher block size.
    #[error("bad IV: expected {expected} bytes, got {actual}")]
    BadIv { expected: usize, actual: usize },

    /// No destination could be provided (empty sink list or sink not creatable).
    #[error("file creation failed: {0}")]
    FileCreationFailed(String),

    /// The source reported an error.
    #[error("read failed: {0}")]
    ReadFailed(#[source] io::Error),

    /// The cipher primitive refused an update or finalize step.
    #[error("transform failed: {0}")]
    TransformFailed(String),

    /// A sink write failed, or transformed bytes remained after the last sink.
    #[error("write failed on sink {sink}: {source}")]
    WriteFailed {
        sink: usize,
        #[source]
        source: io::Error,
    },
}

impl CipherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CipherError::BadInput(_) => ErrorKind::BadInput,
            CipherError::BadIv { .. } => ErrorKind::BadIv,
            CipherError::FileCreationFailed(_) => ErrorKind::FileCreationFailed,
            CipherError::ReadFailed(_) => ErrorKind::ReadFailed,
            CipherError::TransformFailed(_) => ErrorKind::TransformFailed,
            CipherError::WriteFailed { .. } => ErrorKind::WriteFailed,
        }
    }

    pub(crate) fn write_failed(sink: usize, source: io::Error) -> Self {
        CipherError::WriteFailed { sink, source }
    }
}

/// Closed error taxonomy, stable across the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    BadInput,
    BadIv,
    FileCreationFailed,
    ReadFailed,
    TransformFailed,
    WriteFailed,
}

impl ErrorKind {
    /// Stable string code for hosts that only carry strings.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::BadInput => "BadInput",
            ErrorKind::BadIv => "BadIV",
            ErrorKind::FileCreationFailed => "FileCreationFailed",
            ErrorKind::ReadFailed => "ReadFailed",
            ErrorKind::TransformFailed => "TransformFailed",
            ErrorKind::WriteFailed => "WriteFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Operation direction. CTR uses the same keystream both ways,
/// so this only labels telemetry and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}

pub type Result<T> = std::result::Result<T, CipherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_one_to_one() {
        let cases = vec![
            (CipherError::BadInput("x".into()), ErrorKind::BadInput),
            (CipherError::BadIv { expected: 16, actual: 3 }, ErrorKind::BadIv),
            (CipherError::FileCreationFailed("x".into()), ErrorKind::FileCreationFailed),
            (CipherError::ReadFailed(io::Error::other("x")), ErrorKind::ReadFailed),
            (CipherError::TransformFailed("x".into()), ErrorKind::TransformFailed),
            (CipherError::write_failed(2, io::Error::other("x")), ErrorKind::WriteFailed),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind);
        }
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorKind::BadIv.code(), "BadIV");
        assert_eq!(ErrorKind::WriteFailed.to_string(), "WriteFailed");
    }

    #[test]
    fn display_includes_context() {
        let err = CipherError::BadIv { expected: 16, actual: 12 };
        assert_eq!(err.to_string(), "bad IV: expected 16 bytes, got 12");

        let err = CipherError::write_failed(3, io::Error::other("disk full"));
        assert_eq!(err.to_string(), "write failed on sink 3: disk full");
    }
}
