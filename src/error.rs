//! Error taxonomy shared by the store, device and capture layers.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Device capability a permission applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Camera,
    MediaLibrary,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Camera => f.write_str("camera"),
            Capability::MediaLibrary => f.write_str("media library"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("no access to {0}")]
    PermissionDenied(Capability),

    #[error("image database has not been initialized")]
    DatabaseUninitialized,

    #[error("nothing has been captured")]
    NothingCaptured,

    #[error("capture failed: {0}")]
    CaptureFailed(String),

    #[error("failed to access {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

impl GalleryError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GalleryError::File { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;
