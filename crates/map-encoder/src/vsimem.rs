//! In-memory virtual files.
//!
//! Encoders stream into a [`VirtualFile`] registered under a `/vsimem/...`
//! path; the caller reads the bytes back and the file is unlinked when the
//! handle drops, whichever way the caller exits. Paths from
//! [`VirtualFile::create_unique`] embed a v4 UUID so concurrent requests
//! never share a file.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use tracing::debug;
use uuid::Uuid;

use crate::error::EncodeError;

/// Root of the virtual file namespace.
pub const VSIMEM_ROOT: &str = "/vsimem/";

static FILES: Lazy<Mutex<HashMap<String, Vec<u8>>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn files() -> MutexGuard<'static, HashMap<String, Vec<u8>>> {
    // A panic while holding the lock cannot leave a map entry half-updated.
    FILES.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to an in-memory file. The file is unlinked on drop.
#[derive(Debug)]
pub struct VirtualFile {
    path: String,
}

impl VirtualFile {
    /// Create an empty file at `path`. Fails if the path is already in use.
    pub fn create(path: impl Into<String>) -> Result<Self, EncodeError> {
        let path = path.into();
        if !path.starts_with(VSIMEM_ROOT) {
            return Err(EncodeError::VirtualFile(format!(
                "path '{}' is outside {}",
                path, VSIMEM_ROOT
            )));
        }

        let mut files = files();
        if files.contains_key(&path) {
            return Err(EncodeError::VirtualFile(format!(
                "path '{}' already exists",
                path
            )));
        }
        files.insert(path.clone(), Vec::new());
        drop(files);

        debug!(path = %path, "Created virtual file");
        Ok(Self { path })
    }

    /// Create a file at `/vsimem/{prefix}-{uuid}.{extension}`.
    pub fn create_unique(prefix: &str, extension: &str) -> Result<Self, EncodeError> {
        Self::create(format!(
            "{}{}-{}.{}",
            VSIMEM_ROOT,
            prefix,
            Uuid::new_v4(),
            extension
        ))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Appending writer over the file contents.
    pub fn writer(&self) -> VirtualFileWriter<'_> {
        VirtualFileWriter { file: self }
    }

    /// Current size in bytes.
    pub fn len(&self) -> usize {
        files().get(&self.path).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the complete contents.
    pub fn read_all(&self) -> Result<Vec<u8>, EncodeError> {
        files()
            .get(&self.path)
            .cloned()
            .ok_or_else(|| EncodeError::VirtualFile(format!("path '{}' vanished", self.path)))
    }
}

impl Drop for VirtualFile {
    fn drop(&mut self) {
        files().remove(&self.path);
        debug!(path = %self.path, "Unlinked virtual file");
    }
}

/// `io::Write` adapter appending to a [`VirtualFile`].
pub struct VirtualFileWriter<'a> {
    file: &'a VirtualFile,
}

impl Write for VirtualFileWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut files = files();
        let contents = files.get_mut(&self.file.path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} vanished", self.file.path))
        })?;
        contents.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Whether a virtual file currently exists at `path`.
pub fn exists(path: &str) -> bool {
    files().contains_key(path)
}

/// Number of live virtual files whose name starts with `/vsimem/{prefix}`.
pub fn count_with_prefix(prefix: &str) -> usize {
    let full = format!("{}{}", VSIMEM_ROOT, prefix);
    files().keys().filter(|p| p.starts_with(&full)).count()
}
