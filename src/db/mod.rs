mod schema;
pub mod sqlite;
pub mod trash;

use std::path::Path;

pub use schema::SCHEMA;
pub use trash::DeletedImage;

use crate::error::{GalleryError, Result};

/// A stored photo and its capture metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: i64,
    /// File in the photo library
    pub path: String,
    /// ISO-8601 capture/import time
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Fields supplied when inserting; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub path: String,
    pub timestamp: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The image store. Every operation fails with
/// [`GalleryError::DatabaseUninitialized`] until [`Database::initialize`] ran.
pub struct Database {
    inner: sqlite::SqliteDb,
    initialized: bool,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let inner = sqlite::SqliteDb::open(path)?;
        Ok(Self { inner, initialized: false })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.inner.initialize()?;
        self.initialized = true;
        tracing::debug!("Image database initialized");
        Ok(())
    }

    fn db(&self) -> Result<&sqlite::SqliteDb> {
        if self.initialized {
            Ok(&self.inner)
        } else {
            Err(GalleryError::DatabaseUninitialized)
        }
    }

    // ========================================================================
    // Image operations
    // ========================================================================

    pub fn insert(&self, image: &NewImage) -> Result<i64> {
        let id = self.db()?.insert_image(image)?;
        tracing::info!(id, path = %image.path, "Inserted image");
        Ok(id)
    }

    /// All records. Ordered by id, which callers must not rely on.
    pub fn fetch_all(&self) -> Result<Vec<ImageRecord>> {
        self.db()?.get_all_images()
    }

    pub fn get(&self, id: i64) -> Result<Option<ImageRecord>> {
        self.db()?.get_image(id)
    }

    /// Returns false when no record has `image.id`.
    pub fn update(&self, image: &ImageRecord) -> Result<bool> {
        self.db()?.update_image(image)
    }

    /// Deleting an id that does not exist is not an error.
    pub fn delete_by_id(&self, id: i64) -> Result<()> {
        let deleted = self.db()?.delete_image(id)?;
        if deleted == 0 {
            tracing::debug!(id, "Delete requested for missing image");
        } else {
            tracing::info!(id, "Deleted image");
        }
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        self.db()?.count_images()
    }

    // ========================================================================
    // Deleted image operations
    // ========================================================================

    pub fn move_to_deleted(&self, image: &ImageRecord, trash_path: &Path) -> Result<()> {
        self.db()?.move_to_deleted(image, trash_path)
    }

    pub fn fetch_deleted(&self) -> Result<Vec<DeletedImage>> {
        self.db()?.get_deleted_images()
    }

    pub fn restore_deleted(&self, id: i64) -> Result<Option<ImageRecord>> {
        self.db()?.restore_deleted(id)
    }

    pub fn purge_deleted(&self, id: i64) -> Result<()> {
        self.db()?.purge_deleted(id)
    }

    pub fn expired_deleted(&self, max_age_days: u32) -> Result<Vec<DeletedImage>> {
        self.db()?.get_expired_deleted(max_age_days)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) fn open_test_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let mut db = Database::open(&dir.path().join("images.db")).unwrap();
        db.initialize().unwrap();
        (dir, db)
    }

    pub(crate) fn backdate_deleted(db: &Database, id: i64, days: u32) {
        db.inner
            .conn
            .execute(
                "UPDATE deleted_images SET deleted_at = datetime('now', ?) WHERE id = ?",
                rusqlite::params![format!("-{} days", days), id],
            )
            .unwrap();
    }

    fn new_image(path: &str, timestamp: &str, latitude: f64, longitude: f64) -> NewImage {
        NewImage {
            path: path.to_string(),
            timestamp: timestamp.to_string(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_insert_then_fetch_all() {
        let (_dir, db) = open_test_db();
        let image = new_image("/photos/a.jpg", "2024-12-01T10:00:00.000Z", 51.5, -0.12);

        let id = db.insert(&image).unwrap();
        let all = db.fetch_all().unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(
            all[0],
            ImageRecord {
                id,
                path: image.path.clone(),
                timestamp: image.timestamp.clone(),
                latitude: 51.5,
                longitude: -0.12,
            }
        );
    }

    #[test]
    fn test_ids_increase() {
        let (_dir, db) = open_test_db();
        let first = db.insert(&new_image("a.jpg", "t1", 0.0, 0.0)).unwrap();
        let second = db.insert(&new_image("b.jpg", "t2", 0.0, 0.0)).unwrap();
        db.delete_by_id(second).unwrap();
        let third = db.insert(&new_image("c.jpg", "t3", 0.0, 0.0)).unwrap();

        assert!(second > first);
        assert!(third > second, "AUTOINCREMENT must not reuse deleted ids");
    }

    #[test]
    fn test_delete_by_id() {
        let (_dir, db) = open_test_db();
        let keep = db.insert(&new_image("keep.jpg", "t1", 0.0, 0.0)).unwrap();
        let gone = db.insert(&new_image("gone.jpg", "t2", 0.0, 0.0)).unwrap();

        db.delete_by_id(gone).unwrap();

        let ids: Vec<i64> = db.fetch_all().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![keep]);
    }

    #[test]
    fn test_delete_missing_id_is_ok() {
        let (_dir, db) = open_test_db();
        db.insert(&new_image("a.jpg", "t1", 0.0, 0.0)).unwrap();

        db.delete_by_id(9999).unwrap();

        assert_eq!(db.count().unwrap(), 1);
    }

    #[test]
    fn test_update() {
        let (_dir, db) = open_test_db();
        let id = db.insert(&new_image("a.jpg", "t1", 0.0, 0.0)).unwrap();
        let mut record = db.get(id).unwrap().unwrap();
        record.latitude = 10.5;

        assert!(db.update(&record).unwrap());
        assert_eq!(db.get(id).unwrap().unwrap().latitude, 10.5);

        record.id = 424242;
        assert!(!db.update(&record).unwrap());
    }

    #[test]
    fn test_uninitialized_database() {
        let dir = TempDir::new().unwrap();
        let db = Database::open(&dir.path().join("images.db")).unwrap();

        assert!(matches!(db.fetch_all(), Err(GalleryError::DatabaseUninitialized)));
        assert!(matches!(
            db.insert(&new_image("a.jpg", "t", 0.0, 0.0)),
            Err(GalleryError::DatabaseUninitialized)
        ));
    }

    #[test]
    fn test_reopen_keeps_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("images.db");
        {
            let mut db = Database::open(&path).unwrap();
            db.initialize().unwrap();
            db.insert(&new_image("a.jpg", "t1", 1.0, 2.0)).unwrap();
        }
        let mut db = Database::open(&path).unwrap();
        db.initialize().unwrap();
        assert_eq!(db.count().unwrap(), 1);
    }

    #[test]
    fn test_deleted_round_trip() {
        let (_dir, db) = open_test_db();
        let id = db.insert(&new_image("/photos/a.jpg", "t1", 3.0, 4.0)).unwrap();
        let record = db.get(id).unwrap().unwrap();

        db.move_to_deleted(&record, Path::new("/trash/a_1.jpg")).unwrap();
        assert!(db.fetch_all().unwrap().is_empty());

        let deleted = db.fetch_deleted().unwrap();
        assert_eq!(deleted.len(), 1);
        assert_eq!(deleted[0].id, id);
        assert_eq!(deleted[0].path, "/trash/a_1.jpg");
        assert_eq!(deleted[0].original_path, "/photos/a.jpg");

        let restored = db.restore_deleted(id).unwrap().unwrap();
        assert_eq!(restored, record);
        assert_eq!(db.fetch_all().unwrap(), vec![record]);
        assert!(db.fetch_deleted().unwrap().is_empty());
        assert!(db.restore_deleted(id).unwrap().is_none());
    }

    #[test]
    fn test_expired_deleted() {
        let (_dir, db) = open_test_db();
        let old = db.insert(&new_image("old.jpg", "t1", 0.0, 0.0)).unwrap();
        let fresh = db.insert(&new_image("fresh.jpg", "t2", 0.0, 0.0)).unwrap();
        for id in [old, fresh] {
            let record = db.get(id).unwrap().unwrap();
            db.move_to_deleted(&record, Path::new("/trash/x.jpg")).unwrap();
        }
        backdate_deleted(&db, old, 40);

        let expired = db.expired_deleted(30).unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, old);

        db.purge_deleted(old).unwrap();
        assert_eq!(db.fetch_deleted().unwrap().len(), 1);
    }
}
