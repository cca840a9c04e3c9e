pub const SCHEMA: &str = r#"
-- Images table: one row per captured or imported photo
CREATE TABLE IF NOT EXISTS images (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    path TEXT,                     -- File in the photo library
    timestamp TEXT,                -- ISO-8601, set at capture/import time
    latitude REAL DEFAULT 0,
    longitude REAL DEFAULT 0
);

-- Deleted images: rows removed from the gallery whose files sit in the trash
CREATE TABLE IF NOT EXISTS deleted_images (
    id INTEGER PRIMARY KEY,        -- Original images.id, reused on restore
    path TEXT NOT NULL,            -- Current path in trash
    original_path TEXT NOT NULL,   -- Path before trashing
    timestamp TEXT,
    latitude REAL DEFAULT 0,
    longitude REAL DEFAULT 0,
    deleted_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_deleted_images_deleted_at ON deleted_images(deleted_at);
"#;
