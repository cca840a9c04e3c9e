//! SQLite backend implementation.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::schema::SCHEMA;
use super::trash::DeletedImage;
use super::{ImageRecord, NewImage};
use crate::error::{GalleryError, Result};

pub struct SqliteDb {
    pub(crate) conn: Connection,
}

fn row_to_image(row: &rusqlite::Row) -> rusqlite::Result<ImageRecord> {
    Ok(ImageRecord {
        id: row.get(0)?,
        path: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        timestamp: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        latitude: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
        longitude: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
    })
}

fn row_to_deleted(row: &rusqlite::Row) -> rusqlite::Result<DeletedImage> {
    Ok(DeletedImage {
        id: row.get(0)?,
        path: row.get(1)?,
        original_path: row.get(2)?,
        timestamp: row.get(3)?,
        latitude: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        longitude: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
        deleted_at: row.get(6)?,
    })
}

impl SqliteDb {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GalleryError::file(parent, e))?;
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ========================================================================
    // Image operations
    // ========================================================================

    pub fn insert_image(&self, image: &NewImage) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO images (path, timestamp, latitude, longitude) VALUES (?, ?, ?, ?)",
            params![image.path, image.timestamp, image.latitude, image.longitude],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_all_images(&self) -> Result<Vec<ImageRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, path, timestamp, latitude, longitude FROM images ORDER BY id",
        )?;
        let images = stmt
            .query_map([], row_to_image)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(images)
    }

    pub fn get_image(&self, id: i64) -> Result<Option<ImageRecord>> {
        let image = self
            .conn
            .query_row(
                "SELECT id, path, timestamp, latitude, longitude FROM images WHERE id = ?",
                [id],
                row_to_image,
            )
            .optional()?;
        Ok(image)
    }

    pub fn update_image(&self, image: &ImageRecord) -> Result<bool> {
        let changed = self.conn.execute(
            r#"
            UPDATE images
            SET path = ?, timestamp = ?, latitude = ?, longitude = ?
            WHERE id = ?
            "#,
            params![image.path, image.timestamp, image.latitude, image.longitude, image.id],
        )?;
        Ok(changed > 0)
    }

    pub fn delete_image(&self, id: i64) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM images WHERE id = ?", [id])?;
        Ok(deleted)
    }

    pub fn count_images(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }

    // ========================================================================
    // Deleted image operations
    // ========================================================================

    pub fn move_to_deleted(&self, image: &ImageRecord, trash_path: &Path) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT OR REPLACE INTO deleted_images
                (id, path, original_path, timestamp, latitude, longitude)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                image.id,
                trash_path.to_string_lossy(),
                image.path,
                image.timestamp,
                image.latitude,
                image.longitude,
            ],
        )?;
        tx.execute("DELETE FROM images WHERE id = ?", [image.id])?;
        tx.commit()?;
        Ok(())
    }

    pub fn get_deleted_images(&self) -> Result<Vec<DeletedImage>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, path, original_path, timestamp, latitude, longitude, deleted_at
            FROM deleted_images
            ORDER BY deleted_at DESC, id DESC
            "#,
        )?;
        let entries = stmt
            .query_map([], row_to_deleted)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn get_deleted_image(&self, id: i64) -> Result<Option<DeletedImage>> {
        let entry = self
            .conn
            .query_row(
                r#"
                SELECT id, path, original_path, timestamp, latitude, longitude, deleted_at
                FROM deleted_images
                WHERE id = ?
                "#,
                [id],
                row_to_deleted,
            )
            .optional()?;
        Ok(entry)
    }

    /// Put a deleted image back under its original id. Returns `None` if no
    /// deleted entry has that id.
    pub fn restore_deleted(&self, id: i64) -> Result<Option<ImageRecord>> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(entry) = self.get_deleted_image(id)? else {
            return Ok(None);
        };
        tx.execute(
            "INSERT INTO images (id, path, timestamp, latitude, longitude) VALUES (?, ?, ?, ?, ?)",
            params![entry.id, entry.original_path, entry.timestamp, entry.latitude, entry.longitude],
        )?;
        tx.execute("DELETE FROM deleted_images WHERE id = ?", [id])?;
        tx.commit()?;

        Ok(Some(ImageRecord {
            id: entry.id,
            path: entry.original_path,
            timestamp: entry.timestamp.unwrap_or_default(),
            latitude: entry.latitude,
            longitude: entry.longitude,
        }))
    }

    pub fn purge_deleted(&self, id: i64) -> Result<()> {
        self.conn.execute("DELETE FROM deleted_images WHERE id = ?", [id])?;
        Ok(())
    }

    pub fn get_expired_deleted(&self, max_age_days: u32) -> Result<Vec<DeletedImage>> {
        let cutoff = format!("-{} days", max_age_days);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, path, original_path, timestamp, latitude, longitude, deleted_at
            FROM deleted_images
            WHERE deleted_at < datetime('now', ?)
            ORDER BY deleted_at
            "#,
        )?;
        let entries = stmt
            .query_map([cutoff], row_to_deleted)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}
