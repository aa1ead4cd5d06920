
/// Working buffer size used by the read/transform/write loop (8 KiB).
pub const BUFFER_SIZE: usize = 8 * 1024;

/// Upper bound for any configured working buffer (1 MiB).
/// Also the headroom reserved by the chunk-size overflow guard.
pub const MAX_BUFFER_SIZE: usize = 1024 * 1024;

/// AES block size, and therefore the only accepted IV length.
pub const AES_BLOCK_SIZE: usize = 16;

/// AES-256 key length.
pub const KEY_LEN_32: usize = 32;

/// Largest accepted chunk size. `chunk_size + MAX_BUFFER_SIZE` must stay
/// representable in the signed byte-count width used by callers.
pub const MAX_CHUNK_SIZE: i64 = i64::MAX - MAX_BUFFER_SIZE as i64;

/// Queue names (mirrored in logs and worker thread names).
pub mod queue_names {
    pub const ENCRYPTION_QUEUE: &str = "EncryptionQueue";
    pub const DECRYPTION_QUEUE: &str = "DecryptionQueue";
}
