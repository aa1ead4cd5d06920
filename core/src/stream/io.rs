// ## File: `src/stream/io.rs`
// ## Normalized sources and sinks

use std::fs::File;
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::types::CipherError;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    Shared(SharedBuffer),
}

impl InputSource {
    pub fn reader<R: Read + Send + 'static>(r: R) -> Self {
        InputSource::Reader(Box::new(r))
    }
}

impl OutputSink {
    pub fn writer<W: Write + Send + 'static>(w: W) -> Self {
        OutputSink::Writer(Box::new(w))
    }
}

/// Normalize input source into a boxed reader.
/// Open failures surface as `ReadFailed`.
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, CipherError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(p) => Box::new(File::open(&p).map_err(|e| {
            CipherError::ReadFailed(io::Error::new(e.kind(), format!("{}: {e}", p.display())))
        })?),
        InputSource::Memory(b) => Box::new(Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize output sink into a boxed writer.
/// Files are created (or truncated); failure surfaces as `FileCreationFailed`.
pub fn open_output(sink: OutputSink) -> Result<Box<dyn Write + Send>, CipherError> {
    match sink {
        OutputSink::Writer(w) => Ok(w),
        OutputSink::File(p) => {
            let file = File::create(&p).map_err(|e| {
                CipherError::FileCreationFailed(format!("{}: {e}", p.display()))
            })?;
            Ok(Box::new(file))
        }
        OutputSink::Shared(buf) => Ok(Box::new(buf)),
    }
}

/// Open every sink in order. If one fails, the ones already opened are
/// dropped (closed) before the error is returned.
pub fn open_outputs(sinks: Vec<OutputSink>) -> Result<Vec<Box<dyn Write + Send>>, CipherError> {
    sinks.into_iter().map(open_output).collect()
}

/// In-memory sink whose contents stay reachable after the pipeline
/// consumed (and closed) its writer half.
#[derive(Clone, Default, Debug)]
pub struct SharedBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.buf.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.buf.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sink(&self) -> OutputSink {
        OutputSink::Shared(self.clone())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buf
            .lock()
            .map_err(|_| io::Error::other("shared buffer poisoned"))?;
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ================= Utilities =================

/// Fill as much of `buf` as a single successful read allows.
/// `Interrupted` is retried; `Ok(0)` means the source is exhausted.
pub fn read_some<R: Read + ?Sized>(r: &mut R, buf: &mut [u8]) -> Result<usize, CipherError> {
    loop {
        match r.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CipherError::ReadFailed(e)),
        }
    }
}
