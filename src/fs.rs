//! File system port
//!
//! Abstracts file I/O so the reconciler, tracker, and driver can run against
//! local disk in production and an in-memory mock in tests.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{WeftError, WeftResult};

/// Abstract file system interface
pub trait FileSystem {
    /// Read file content
    fn read_to_string(&self, path: &Path) -> WeftResult<String>;

    /// Write file content atomically, creating parent directories
    fn write_atomic(&self, path: &Path, content: &str) -> WeftResult<()>;

    /// Check if file exists
    fn exists(&self, path: &Path) -> bool;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> WeftResult<()>;

    /// Compute SHA256 hash of file content
    fn hash_file(&self, path: &Path) -> WeftResult<String>;
}

/// Compute SHA256 hash of a content string, formatted as `sha256:<hex>`
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}

/// Local disk implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read_to_string(&self, path: &Path) -> WeftResult<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write_atomic(&self, path: &Path, content: &str) -> WeftResult<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        // tempfile + rename so readers never observe a half-written snapshot
        let tmp = tempfile::NamedTempFile::new_in(parent)?;
        std::fs::write(tmp.path(), content)?;
        tmp.persist(path)
            .map_err(|e| WeftError::Io(e.error))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> WeftResult<()> {
        Ok(std::fs::remove_file(path)?)
    }

    fn hash_file(&self, path: &Path) -> WeftResult<String> {
        let bytes = std::fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("sha256:{:x}", hasher.finalize()))
    }
}

/// Mock file system for testing
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockFileSystem {
    pub files:
        std::sync::Arc<std::sync::Mutex<std::collections::HashMap<std::path::PathBuf, String>>>,
    /// Paths whose removal fails with PermissionDenied
    pub locked: std::sync::Arc<std::sync::Mutex<std::collections::HashSet<std::path::PathBuf>>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<std::path::PathBuf>, content: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.to_string());
    }

    pub fn lock_path(&self, path: impl Into<std::path::PathBuf>) {
        self.locked.lock().unwrap().insert(path.into());
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> WeftResult<String> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| {
            WeftError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file not found",
            ))
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> WeftResult<()> {
        let mut files = self.files.lock().unwrap();
        files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn remove_file(&self, path: &Path) -> WeftResult<()> {
        if self.locked.lock().unwrap().contains(path) {
            return Err(WeftError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "permission denied",
            )));
        }
        let mut files = self.files.lock().unwrap();
        if files.remove(path).is_none() {
            return Err(WeftError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file not found",
            )));
        }
        Ok(())
    }

    fn hash_file(&self, path: &Path) -> WeftResult<String> {
        let content = self.read_to_string(path)?;
        Ok(hash_content(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn hash_content_is_prefixed_and_stable() {
        let a = hash_content("hello");
        let b = hash_content("hello");
        assert_eq!(a, b);
        assert!(a.starts_with("sha256:"));
    }

    #[test]
    fn local_fs_write_atomic_creates_parents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/state.toml");

        let fs = LocalFs::new();
        fs.write_atomic(&path, "version = 1").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "version = 1");
    }

    #[test]
    fn local_fs_hash_matches_content_hash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "content").unwrap();

        let fs = LocalFs::new();
        assert_eq!(fs.hash_file(&path).unwrap(), hash_content("content"));
    }

    #[test]
    fn mock_fs_remove_missing_is_not_found() {
        let fs = MockFileSystem::new();
        let err = fs.remove_file(&PathBuf::from("gone.txt")).unwrap_err();
        assert!(err.is_not_found());
    }
}
