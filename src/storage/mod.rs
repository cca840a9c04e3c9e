//! The photo library directory. Image records reference files in here.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{GalleryError, Result};

pub struct PhotoStorage {
    root: PathBuf,
}

impl PhotoStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_root(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(|e| GalleryError::file(&self.root, e))?;
        }
        Ok(())
    }

    /// Unique file name derived from the capture time. The counter keeps
    /// names distinct for photos taken within the same second.
    fn generate_name(&self, taken_at: DateTime<Utc>, extension: &str) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!("IMG_{}_{}.{}", taken_at.format("%Y%m%d_%H%M%S"), seq, extension);
        self.root.join(name)
    }

    /// Write photo bytes into the library and return the new file's path.
    pub fn save(&self, bytes: &[u8], taken_at: DateTime<Utc>) -> Result<PathBuf> {
        self.ensure_root()?;

        let mut path = self.generate_name(taken_at, extension_for(bytes));
        while path.exists() {
            path = self.generate_name(taken_at, extension_for(bytes));
        }

        fs::write(&path, bytes).map_err(|e| GalleryError::file(&path, e))?;
        tracing::debug!("Saved {} bytes to {:?}", bytes.len(), path);
        Ok(path)
    }

    /// Remove a file, logging instead of failing. Missing files are ignored.
    pub fn remove_best_effort(path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => tracing::debug!("Removed {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {:?}: {}", path, e),
        }
    }
}

/// File extension matching the encoded image, `jpg` when unrecognised.
fn extension_for(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("jpg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn test_save_creates_root_and_unique_names() {
        let dir = tempdir().unwrap();
        let storage = PhotoStorage::new(dir.path().join("photos"));
        let now = Utc::now();

        let first = storage.save(b"one", now).unwrap();
        let second = storage.save(b"two", now).unwrap();

        assert_ne!(first, second);
        assert!(first.starts_with(storage.root()));
        assert_eq!(fs::read(&first).unwrap(), b"one");
        assert_eq!(fs::read(&second).unwrap(), b"two");
    }

    #[test]
    fn test_extension_follows_format() {
        assert_eq!(extension_for(PNG_MAGIC), "png");
        assert_eq!(extension_for(b"garbage"), "jpg");
    }

    #[test]
    fn test_remove_best_effort() {
        let dir = tempdir().unwrap();
        let storage = PhotoStorage::new(dir.path().to_path_buf());
        let path = storage.save(b"bytes", Utc::now()).unwrap();

        PhotoStorage::remove_best_effort(&path);
        assert!(!path.exists());

        // Second removal is a silent no-op
        PhotoStorage::remove_best_effort(&path);
    }
}
