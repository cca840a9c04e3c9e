//! Gallery browsing: load records, filter them, move a selection over a
//! fixed-column grid, and delete.

use anyhow::Result;
use std::path::Path;

use crate::db::{Database, ImageRecord};
use crate::storage::PhotoStorage;
use crate::trash::TrashManager;

/// Records whose timestamp, latitude or longitude text contains `query`.
/// An empty query keeps everything.
pub fn filter_records(records: &[ImageRecord], query: &str) -> Vec<ImageRecord> {
    if query.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| {
            record.timestamp.contains(query)
                || record.latitude.to_string().contains(query)
                || record.longitude.to_string().contains(query)
        })
        .cloned()
        .collect()
}

/// Gallery state independent of rendering.
pub struct GalleryBrowser {
    /// Everything the store returned on the last load
    records: Vec<ImageRecord>,
    /// Records matching the current query, in grid order
    pub visible: Vec<ImageRecord>,
    pub query: String,
    pub selected: usize,
    pub columns: usize,
}

impl GalleryBrowser {
    /// `columns` is clamped to what a terminal row can hold.
    pub fn new(columns: usize) -> Self {
        Self {
            records: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            selected: 0,
            columns: columns.clamp(1, u16::MAX as usize),
        }
    }

    /// Re-fetch every record. The current query and selected id are kept
    /// where possible.
    pub fn load(&mut self, db: &Database) -> Result<()> {
        let records = db.fetch_all()?;
        tracing::debug!("Gallery loaded {} images", records.len());
        self.set_records(records);
        Ok(())
    }

    pub fn set_records(&mut self, records: Vec<ImageRecord>) {
        let selected_id = self.selected_record().map(|r| r.id);
        self.records = records;
        self.apply_filter(selected_id);
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn set_query(&mut self, query: &str) {
        let selected_id = self.selected_record().map(|r| r.id);
        self.query = query.to_string();
        self.apply_filter(selected_id);
    }

    fn apply_filter(&mut self, keep_id: Option<i64>) {
        self.visible = filter_records(&self.records, &self.query);
        self.selected = keep_id
            .and_then(|id| self.visible.iter().position(|r| r.id == id))
            .unwrap_or_else(|| self.selected.min(self.visible.len().saturating_sub(1)));
    }

    pub fn selected_record(&self) -> Option<&ImageRecord> {
        self.visible.get(self.selected)
    }

    pub fn select(&mut self, index: usize) {
        if index < self.visible.len() {
            self.selected = index;
        }
    }

    pub fn move_left(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.selected < self.visible.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.selected >= self.columns {
            self.selected -= self.columns;
        }
    }

    pub fn move_down(&mut self) {
        let new_idx = self.selected + self.columns;
        if new_idx < self.visible.len() {
            self.selected = new_idx;
        }
    }

    pub fn move_to_start(&mut self) {
        self.selected = 0;
    }

    pub fn move_to_end(&mut self) {
        self.selected = self.visible.len().saturating_sub(1);
    }

    pub fn total_rows(&self) -> usize {
        self.visible.len().div_ceil(self.columns)
    }
}

/// Delete a record and dispose of its file: into the trash when one is
/// configured, otherwise removed outright. File problems are logged; only
/// store failures are returned.
pub fn delete_image(db: &Database, trash: Option<&TrashManager>, record: &ImageRecord) -> Result<()> {
    let path = Path::new(&record.path);

    if let Some(trash) = trash {
        if path.is_file() {
            match trash.move_to_trash(path) {
                Ok(trash_path) => {
                    if let Err(e) = db.move_to_deleted(record, &trash_path) {
                        // Put the file back so the record still points at it
                        if let Err(undo) = trash.restore(&trash_path, path) {
                            tracing::error!("Could not return {:?} from trash: {:#}", trash_path, undo);
                        }
                        return Err(e.into());
                    }
                    tracing::info!("Moved image {} to trash at {:?}", record.id, trash_path);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Could not trash {:?}, deleting instead: {:#}", path, e);
                }
            }
        }
    }

    db.delete_by_id(record.id)?;
    if !record.path.is_empty() {
        PhotoStorage::remove_best_effort(path);
    }
    Ok(())
}
