// * end-to-end encrypt -> decrypt correctness
// * boundary conditions (empty input, buffer-sized input)
// * validation before I/O (bad IV in both directions)
// * error propagation (read failure, write failure, missing files)
// * open-stage failures reach the log

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor, Read, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use proptest::prelude::*;

    use ctrcrypt_core::constants::BUFFER_SIZE;
    use ctrcrypt_core::crypto::CipherKey;
    use ctrcrypt_core::stream::{
        decrypt, encrypt, encrypt_to_chunks, InputSource, OutputSink, SharedBuffer,
    };
    use ctrcrypt_core::telemetry::Stage;
    use ctrcrypt_core::types::{CipherError, Direction, ErrorKind};

    // ------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------
    struct CountingReader {
        inner: Cursor<Vec<u8>>,
        reads: Arc<AtomicUsize>,
    }

    impl Read for CountingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(buf)
        }
    }

    fn counting_source(data: Vec<u8>) -> (InputSource, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let reader = CountingReader { inner: Cursor::new(data), reads: reads.clone() };
        (InputSource::reader(reader), reads)
    }

    fn zero_key() -> CipherKey {
        CipherKey::new([0u8; 32])
    }

    fn encrypt_bytes(plain: &[u8], key: &CipherKey, iv: &[u8]) -> Vec<u8> {
        let out = SharedBuffer::new();
        encrypt(InputSource::Memory(plain.to_vec()), out.sink(), key, iv).expect("encrypt");
        out.contents()
    }

    fn decrypt_bytes(cipher: &[u8], key: &CipherKey, iv: &[u8]) -> Vec<u8> {
        let out = SharedBuffer::new();
        decrypt(InputSource::Memory(cipher.to_vec()), out.sink(), key, iv).expect("decrypt");
        out.contents()
    }

    // ------------------------------------------------------------
    // Round trips
    // ------------------------------------------------------------
    #[test]
    fn roundtrip_multi_buffer_input() {
        let key = CipherKey::new([0x42; 32]);
        let iv = [0x24u8; 16];
        let plain: Vec<u8> = (0..(3 * BUFFER_SIZE + 123)).map(|i| (i % 256) as u8).collect();

        let cipher = encrypt_bytes(&plain, &key, &iv);
        assert_eq!(cipher.len(), plain.len());
        assert_ne!(cipher, plain);
        assert_eq!(decrypt_bytes(&cipher, &key, &iv), plain);
    }

    #[test]
    fn empty_input_produces_empty_output() {
        let out = SharedBuffer::new();
        let snap = encrypt(InputSource::Memory(Vec::new()), out.sink(), &zero_key(), &[0u8; 16])
            .expect("empty input is not an error");
        assert!(out.is_empty());
        assert_eq!(snap.bytes_read, 0);
        assert_eq!(snap.keystream_offset, 0);
        assert!(snap.sanity_check());
    }

    #[test]
    fn snapshot_reports_run() {
        let out = SharedBuffer::new();
        let snap = decrypt(InputSource::Memory(vec![9u8; 20_000]), out.sink(), &zero_key(), &[1u8; 16])
            .unwrap();
        assert_eq!(snap.direction, Direction::Decrypt);
        assert_eq!(snap.bytes_read, 20_000);
        assert_eq!(snap.bytes_written, 20_000);
        assert_eq!(snap.keystream_offset, 20_000);
        assert_eq!(snap.chunk_lengths, vec![20_000]);
        assert!(snap.has_all_stages(&[Stage::Validate, Stage::Open, Stage::Read, Stage::Transform, Stage::Write]));
        assert!(snap.sanity_check());
    }

    #[test]
    fn different_iv_gives_different_ciphertext() {
        let plain = vec![0u8; 64];
        let a = encrypt_bytes(&plain, &zero_key(), &[0u8; 16]);
        let b = encrypt_bytes(&plain, &zero_key(), &[1u8; 16]);
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            plain in proptest::collection::vec(any::<u8>(), 0..40_000),
            key in any::<[u8; 32]>(),
            iv in any::<[u8; 16]>(),
        ) {
            let key = CipherKey::new(key);
            let cipher = encrypt_bytes(&plain, &key, &iv);
            prop_assert_eq!(cipher.len(), plain.len());
            prop_assert_eq!(decrypt_bytes(&cipher, &key, &iv), plain);
        }
    }

    // ------------------------------------------------------------
    // Validation before I/O
    // ------------------------------------------------------------
    #[test]
    fn bad_iv_rejected_before_any_read() {
        for len in [0usize, 1, 8, 12, 15, 17, 24, 32] {
            for direction in [Direction::Encrypt, Direction::Decrypt] {
                let (source, reads) = counting_source(vec![1u8; 128]);
                let out = SharedBuffer::new();
                let iv = vec![0u8; len];
                let result = match direction {
                    Direction::Encrypt => encrypt(source, out.sink(), &zero_key(), &iv),
                    Direction::Decrypt => decrypt(source, out.sink(), &zero_key(), &iv),
                };
                let err = result.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::BadIv, "iv len {len}, {direction}");
                assert_eq!(reads.load(Ordering::SeqCst), 0);
                assert!(out.is_empty());
            }
        }
    }

    #[test]
    fn bad_iv_does_not_create_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("never.bin");
        let err = encrypt(
            InputSource::Memory(vec![1u8; 4]),
            OutputSink::File(out_path.clone()),
            &zero_key(),
            &[0u8; 8],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadIv);
        assert!(!out_path.exists());
    }

    // ------------------------------------------------------------
    // Runtime failures
    // ------------------------------------------------------------
    struct BrokenAfter {
        good: usize,
    }

    impl Read for BrokenAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.good == 0 {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "source closed out-of-band"));
            }
            self.good -= 1;
            buf.fill(7);
            Ok(buf.len())
        }
    }

    #[test]
    fn read_failure_mid_stream() {
        let out = SharedBuffer::new();
        let err = encrypt(InputSource::reader(BrokenAfter { good: 2 }), out.sink(), &zero_key(), &[0u8; 16])
            .unwrap_err();
        assert!(matches!(err, CipherError::ReadFailed(_)));
        // what was already transformed stays in the sink; nothing is reported as success
        assert_eq!(out.len(), 2 * BUFFER_SIZE);
    }

    struct FullDisk {
        capacity: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.capacity == 0 {
                return Err(io::Error::other("no space left"));
            }
            let n = buf.len().min(self.capacity);
            self.capacity -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_is_write_failed() {
        let err = encrypt(
            InputSource::Memory(vec![0u8; 10_000]),
            OutputSink::writer(FullDisk { capacity: 100 }),
            &zero_key(),
            &[0u8; 16],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::WriteFailed);
    }

    #[test]
    fn missing_source_file_is_read_failed() {
        let dir = tempfile::tempdir().unwrap();
        let err = decrypt(
            InputSource::File(dir.path().join("missing.enc")),
            SharedBuffer::new().sink(),
            &zero_key(),
            &[0u8; 16],
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReadFailed);
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let plain_path = dir.path().join("plain.bin");
        let enc_path = dir.path().join("plain.bin.enc");
        let dec_path = dir.path().join("plain.dec");
        let plain: Vec<u8> = (0..50_000u32).map(|i| (i ^ (i >> 8)) as u8).collect();
        std::fs::write(&plain_path, &plain).unwrap();

        let key = CipherKey::from_hex(&"ab".repeat(32)).unwrap();
        let iv = ctrcrypt_core::crypto::iv_from_hex(&"01".repeat(16)).unwrap();

        encrypt(InputSource::File(plain_path), OutputSink::File(enc_path.clone()), &key, &iv).unwrap();
        decrypt(InputSource::File(enc_path.clone()), OutputSink::File(dec_path.clone()), &key, &iv).unwrap();

        assert_ne!(std::fs::read(&enc_path).unwrap(), plain);
        assert_eq!(std::fs::read(&dec_path).unwrap(), plain);
    }

    // ------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------
    fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = SharedBuffer::new();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, String::from_utf8_lossy(&logs.contents()).into_owned())
    }

    #[test]
    fn missing_source_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (result, logs) = capture_warnings(|| {
            decrypt(
                InputSource::File(dir.path().join("missing.enc")),
                SharedBuffer::new().sink(),
                &zero_key(),
                &[0u8; 16],
            )
        });
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ReadFailed);
        assert!(logs.contains("[OPEN]"), "logs: {logs}");
        assert!(logs.contains("ReadFailed"), "logs: {logs}");
    }

    #[test]
    fn uncreatable_chunk_sink_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (result, logs) = capture_warnings(|| {
            encrypt_to_chunks(
                InputSource::Memory(vec![1u8; 10]),
                vec![OutputSink::File(dir.path().join("no-such-dir").join("part.0"))],
                &zero_key(),
                &[0u8; 16],
                5,
            )
        });
        assert_eq!(result.unwrap_err().kind(), ErrorKind::FileCreationFailed);
        assert!(logs.contains("[OPEN]"), "logs: {logs}");
        assert!(logs.contains("FileCreationFailed"), "logs: {logs}");
    }
}
