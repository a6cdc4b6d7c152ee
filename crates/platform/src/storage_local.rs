//! Local filesystem Storage implementation for host builds.
//!
//! `LocalFileStorage` implements `platform::Storage` using `std::fs`.
//! Used when the `std` feature is enabled (host tools and tests only).
//! All paths are resolved relative to the `root` provided at construction.

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::storage::{File, Storage};

/// Error type for local filesystem operations.
#[derive(Debug)]
pub struct LocalStorageError(pub std::io::Error);

impl core::fmt::Display for LocalStorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "local storage error: {}", self.0)
    }
}

impl std::error::Error for LocalStorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// An open file on the local filesystem.
pub struct LocalFile {
    inner: fs::File,
    size: u64,
}

impl File for LocalFile {
    type Error = LocalStorageError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Read::read(&mut self.inner, buf).map_err(LocalStorageError)
    }

    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let n = Write::write(&mut self.inner, buf).map_err(LocalStorageError)?;
        let pos = self.inner.stream_position().map_err(LocalStorageError)?;
        self.size = self.size.max(pos);
        Ok(n)
    }

    async fn seek(&mut self, pos: u64) -> Result<u64, Self::Error> {
        Seek::seek(&mut self.inner, SeekFrom::Start(pos)).map_err(LocalStorageError)
    }

    fn size(&self) -> u64 {
        self.size
    }
}

/// A `platform::Storage` implementation backed by `std::fs`.
///
/// # Example
/// ```no_run
/// # async fn example() {
/// use platform::storage_local::LocalFileStorage;
/// use platform::Storage;
/// let mut storage = LocalFileStorage::new("/tmp/audio");
/// let file = storage.open_file("tone.wav").await.unwrap();
/// # }
/// ```
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Create a new storage rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create from the `AUDIO_ROOT` environment variable.
    ///
    /// Returns `None` if `AUDIO_ROOT` is not set or is not valid UTF-8.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        std::env::var("AUDIO_ROOT").ok().map(Self::new)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

impl Storage for LocalFileStorage {
    type Error = LocalStorageError;
    type File = LocalFile;

    async fn open_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let full = self.resolve(path);
        let file = fs::File::open(&full).map_err(LocalStorageError)?;
        let meta = file.metadata().map_err(LocalStorageError)?;
        Ok(LocalFile { inner: file, size: meta.len() })
    }

    async fn create_file(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let full = self.resolve(path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full)
            .map_err(LocalStorageError)?;
        Ok(LocalFile { inner: file, size: 0 })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(self.resolve(path).exists())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::storage::{File, Storage};
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn local_storage_read_full_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("test.bin"), b"hello world").unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        let mut file = storage.open_file("test.bin").await.unwrap();
        let mut buf = [0u8; 11];
        let n = file.read(&mut buf).await.unwrap();
        assert_eq!(n, 11);
        assert_eq!(&buf, b"hello world");
    }

    #[tokio::test]
    async fn local_storage_size_matches() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("size.bin"), [0u8; 64]).unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        let file = storage.open_file("size.bin").await.unwrap();
        assert_eq!(file.size(), 64);
    }

    #[tokio::test]
    async fn local_storage_seek_and_read() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("seek.bin"), b"ABCDEFGH").unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        let mut file = storage.open_file("seek.bin").await.unwrap();
        file.seek(4).await.unwrap();
        let mut buf = [0u8; 4];
        file.read(&mut buf).await.unwrap();
        assert_eq!(&buf, b"EFGH");
    }

    #[tokio::test]
    async fn local_storage_create_write_backfill() {
        let tmp = TempDir::new().unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        let mut file = storage.create_file("out.bin").await.unwrap();
        file.write(&[0u8; 4]).await.unwrap();
        file.write(b"data").await.unwrap();
        assert_eq!(file.size(), 8);
        file.seek(0).await.unwrap();
        file.write(b"HEAD").await.unwrap();
        assert_eq!(file.size(), 8);
        drop(file);
        assert_eq!(fs::read(tmp.path().join("out.bin")).unwrap(), b"HEADdata");
    }

    #[tokio::test]
    async fn local_storage_create_truncates() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("old.bin"), b"previous contents").unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        let file = storage.create_file("old.bin").await.unwrap();
        assert_eq!(file.size(), 0);
        drop(file);
        assert!(fs::read(tmp.path().join("old.bin")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_storage_exists_true() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("exists.bin"), b"x").unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        assert!(storage.exists("exists.bin").await.unwrap());
    }

    #[tokio::test]
    async fn local_storage_exists_false() {
        let tmp = TempDir::new().unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        assert!(!storage.exists("missing.bin").await.unwrap());
    }

    #[tokio::test]
    async fn local_storage_open_missing_is_error() {
        let tmp = TempDir::new().unwrap();
        let mut storage = LocalFileStorage::new(tmp.path());
        assert!(storage.open_file("missing.wav").await.is_err());
    }
}
