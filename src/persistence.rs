//! File access for edited documents
//!
//! The session only ever reads a whole file or overwrites a whole file, so
//! the port is two calls. Tests swap in stores that fail on purpose.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

/// Whole-file read and write
pub trait DocumentStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the file's contents with `bytes`
    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Local filesystem store
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStore;

impl DocumentStore for FileStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let bytes = fs::read(path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "read document");
        Ok(bytes)
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote document");
        Ok(())
    }
}
