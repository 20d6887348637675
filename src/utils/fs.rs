//! Filesystem helpers
//!
//! Continuation artifacts are re-read by the next font, so every write
//! is flushed to disk before returning.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Write `data` to `path` and wait until it is durable on disk
pub fn write_durable(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

/// Remove a file, treating "already gone" as success
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_durable_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.cfg");
        write_durable(&path, b"first").unwrap();
        write_durable(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_remove_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.png");
        assert!(remove_if_exists(&path).is_ok());
        write_durable(&path, b"x").unwrap();
        remove_if_exists(&path).unwrap();
        assert!(!path.exists());
    }
}
