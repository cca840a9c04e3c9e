use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::TrashConfig;
use crate::db::{Database, DeletedImage, ImageRecord};

pub struct TrashManager {
    config: TrashConfig,
}

/// Result of a cleanup operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupResult {
    pub entries_removed: usize,
    pub files_deleted: usize,
}

impl TrashManager {
    pub fn new(config: TrashConfig) -> Self {
        Self { config }
    }

    /// The trash to move newly deleted photos into, or `None` when deleting
    /// should remove files immediately. Photos already in the trash are
    /// managed either way.
    pub fn for_new_deletes(&self) -> Option<&Self> {
        self.config.enabled.then_some(self)
    }

    fn ensure_trash_dir(&self) -> Result<()> {
        if !self.config.path.exists() {
            fs::create_dir_all(&self.config.path)
                .context("Failed to create trash directory")?;
        }
        Ok(())
    }

    /// Generate a unique trash filename to avoid conflicts.
    /// Uses a global atomic counter to ensure uniqueness even when called
    /// several times within the same second.
    fn generate_trash_name(&self, original: &Path) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let timestamp = Utc::now().timestamp();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let original_name = original.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let extension = original.extension()
            .map(|s| format!(".{}", s.to_string_lossy()))
            .unwrap_or_default();

        let trash_name = format!("{}_{}_{}{}", original_name, timestamp, seq, extension);
        self.config.path.join(trash_name)
    }

    /// Move file to trash, returns new path
    pub fn move_to_trash(&self, path: &Path) -> Result<PathBuf> {
        self.ensure_trash_dir()?;

        let trash_path = self.generate_trash_name(path);

        // Rename when on the same filesystem, copy + delete otherwise
        match fs::rename(path, &trash_path) {
            Ok(_) => Ok(trash_path),
            Err(_) => {
                fs::copy(path, &trash_path)
                    .context("Failed to copy file to trash")?;
                fs::remove_file(path)
                    .context("Failed to remove original file after copying to trash")?;
                Ok(trash_path)
            }
        }
    }

    /// Restore file from trash to original location
    pub fn restore(&self, trash_path: &Path, original_path: &Path) -> Result<()> {
        if let Some(parent) = original_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .context("Failed to create parent directory for restore")?;
            }
        }

        if original_path.exists() {
            anyhow::bail!("Cannot restore: file already exists at {}", original_path.display());
        }

        match fs::rename(trash_path, original_path) {
            Ok(_) => Ok(()),
            Err(_) => {
                fs::copy(trash_path, original_path)
                    .context("Failed to copy file from trash")?;
                fs::remove_file(trash_path)
                    .context("Failed to remove file from trash after copying")?;
                Ok(())
            }
        }
    }

    /// Permanently delete a trashed file. A file that is already gone is
    /// not an error.
    pub fn delete_permanently(&self, trash_path: &Path) -> Result<()> {
        match fs::remove_file(trash_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to permanently delete file"),
        }
    }

    pub fn max_age_days(&self) -> u32 {
        self.config.max_age_days
    }

    // ========================================================================
    // Deleted photos
    // ========================================================================

    /// Put a deleted photo back into the gallery. If the store refuses the
    /// record, the file goes back into the trash.
    pub fn restore_image(&self, db: &Database, entry: &DeletedImage) -> Result<ImageRecord> {
        let trash_path = Path::new(&entry.path);
        let original_path = Path::new(&entry.original_path);

        let moved = if trash_path.exists() {
            self.restore(trash_path, original_path)?;
            true
        } else {
            tracing::warn!("Trashed file {:?} is missing; restoring record only", trash_path);
            false
        };

        let restored = db
            .restore_deleted(entry.id)
            .map_err(anyhow::Error::from)
            .and_then(|record| {
                record.with_context(|| format!("Deleted image {} no longer exists", entry.id))
            });

        match restored {
            Ok(record) => {
                tracing::info!("Restored image {} to {}", record.id, record.path);
                Ok(record)
            }
            Err(e) => {
                if moved {
                    if let Err(undo) = self.restore(original_path, trash_path) {
                        tracing::error!("Could not return {:?} to trash: {:#}", original_path, undo);
                    }
                }
                Err(e)
            }
        }
    }

    /// Remove a deleted photo for good.
    pub fn delete_image_permanently(&self, db: &Database, entry: &DeletedImage) -> Result<()> {
        self.delete_permanently(Path::new(&entry.path))?;
        db.purge_deleted(entry.id)?;
        tracing::info!("Permanently deleted image {}", entry.id);
        Ok(())
    }

    /// Permanently delete entries older than the configured maximum age.
    pub fn purge_expired(&self, db: &Database) -> Result<CleanupResult> {
        let mut result = CleanupResult::default();

        for entry in db.expired_deleted(self.config.max_age_days)? {
            let trash_path = Path::new(&entry.path);
            if trash_path.exists() {
                match self.delete_permanently(trash_path) {
                    Ok(()) => result.files_deleted += 1,
                    Err(e) => {
                        tracing::warn!("Failed to purge {:?}: {:#}", trash_path, e);
                        continue;
                    }
                }
            }
            db.purge_deleted(entry.id)?;
            result.entries_removed += 1;
        }

        if result.entries_removed > 0 {
            tracing::info!(
                "Purged {} expired deleted photos ({} files)",
                result.entries_removed,
                result.files_deleted
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::{backdate_deleted, open_test_db};
    use crate::db::NewImage;
    use tempfile::{tempdir, TempDir};

    fn manager(dir: &TempDir) -> TrashManager {
        TrashManager::new(TrashConfig {
            enabled: true,
            path: dir.path().join("trash"),
            max_age_days: 30,
        })
    }

    #[test]
    fn test_for_new_deletes_respects_enabled() {
        let mut config = TrashConfig::default();
        assert!(TrashManager::new(config.clone()).for_new_deletes().is_some());
        config.enabled = false;
        assert!(TrashManager::new(config).for_new_deletes().is_none());
    }

    #[test]
    fn test_move_and_restore_file() {
        let dir = tempdir().unwrap();
        let trash = manager(&dir);
        let original = dir.path().join("photos/a.jpg");
        fs::create_dir_all(original.parent().unwrap()).unwrap();
        fs::write(&original, b"jpeg").unwrap();

        let trashed = trash.move_to_trash(&original).unwrap();
        assert!(!original.exists());
        assert!(trashed.starts_with(dir.path().join("trash")));
        assert_eq!(trashed.extension().unwrap(), "jpg");

        trash.restore(&trashed, &original).unwrap();
        assert_eq!(fs::read(&original).unwrap(), b"jpeg");
        assert!(!trashed.exists());
    }

    #[test]
    fn test_restore_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let trash = manager(&dir);
        let original = dir.path().join("a.jpg");
        fs::write(&original, b"first").unwrap();
        let trashed = trash.move_to_trash(&original).unwrap();
        fs::write(&original, b"second").unwrap();

        assert!(trash.restore(&trashed, &original).is_err());
        assert_eq!(fs::read(&original).unwrap(), b"second");
    }

    fn trashed_image(db: &Database, trash: &TrashManager, dir: &TempDir, name: &str) -> DeletedImage {
        let original = dir.path().join(name);
        fs::write(&original, b"jpeg").unwrap();
        let id = db
            .insert(&NewImage {
                path: original.to_string_lossy().into_owned(),
                timestamp: "2024-12-01T00:00:00.000Z".to_string(),
                latitude: 1.5,
                longitude: 2.5,
            })
            .unwrap();
        let record = db.get(id).unwrap().unwrap();
        let trash_path = trash.move_to_trash(&original).unwrap();
        db.move_to_deleted(&record, &trash_path).unwrap();
        db.fetch_deleted()
            .unwrap()
            .into_iter()
            .find(|entry| entry.id == id)
            .unwrap()
    }

    #[test]
    fn test_restore_image() {
        let (_db_dir, db) = open_test_db();
        let dir = tempdir().unwrap();
        let trash = manager(&dir);
        let entry = trashed_image(&db, &trash, &dir, "a.jpg");

        let record = trash.restore_image(&db, &entry).unwrap();

        assert_eq!(record.id, entry.id);
        assert!(Path::new(&record.path).is_file());
        assert_eq!(db.fetch_all().unwrap(), vec![record]);
        assert!(db.fetch_deleted().unwrap().is_empty());
    }

    #[test]
    fn test_failed_restore_keeps_file_in_trash() {
        let (_db_dir, db) = open_test_db();
        let dir = tempdir().unwrap();
        let trash = manager(&dir);
        let entry = trashed_image(&db, &trash, &dir, "a.jpg");
        db.purge_deleted(entry.id).unwrap();

        assert!(trash.restore_image(&db, &entry).is_err());

        assert!(Path::new(&entry.path).is_file());
        assert!(!Path::new(&entry.original_path).exists());
        assert!(db.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_restore_into_uninitialized_store_keeps_file_in_trash() {
        let (_db_dir, db) = open_test_db();
        let dir = tempdir().unwrap();
        let trash = manager(&dir);
        let entry = trashed_image(&db, &trash, &dir, "a.jpg");
        let other = Database::open(&dir.path().join("other.db")).unwrap();

        assert!(trash.restore_image(&other, &entry).is_err());

        assert!(Path::new(&entry.path).is_file());
        assert!(!Path::new(&entry.original_path).exists());
        assert_eq!(db.fetch_deleted().unwrap(), vec![entry]);
    }

    #[test]
    fn test_delete_image_permanently() {
        let (_db_dir, db) = open_test_db();
        let dir = tempdir().unwrap();
        let trash = manager(&dir);
        let entry = trashed_image(&db, &trash, &dir, "a.jpg");

        trash.delete_image_permanently(&db, &entry).unwrap();

        assert!(!Path::new(&entry.path).exists());
        assert!(db.fetch_deleted().unwrap().is_empty());
        assert!(db.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let (_db_dir, db) = open_test_db();
        let dir = tempdir().unwrap();
        let trash = manager(&dir);
        let old = trashed_image(&db, &trash, &dir, "old.jpg");
        let fresh = trashed_image(&db, &trash, &dir, "fresh.jpg");

        assert_eq!(trash.purge_expired(&db).unwrap(), CleanupResult::default());

        backdate_deleted(&db, old.id, 45);
        let result = trash.purge_expired(&db).unwrap();

        assert_eq!(result, CleanupResult { entries_removed: 1, files_deleted: 1 });
        assert!(!Path::new(&old.path).exists());
        assert!(Path::new(&fresh.path).exists());
        let remaining: Vec<i64> = db.fetch_deleted().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(remaining, vec![fresh.id]);
    }
}
