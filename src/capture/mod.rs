//! Capture flow: permission, capture or pick, then discard or commit.
//!
//! ```text
//! permission:  Unknown ──request──▶ Denied | Granted
//! photo:       Idle ──capture/pick──▶ Captured ──discard──▶ Idle
//!                                              └─commit───▶ Idle (record stored)
//! ```
//!
//! Nothing touches the store or the photo library before `commit`.

use chrono::{SecondsFormat, Utc};
use std::path::{Path, PathBuf};

use crate::db::{Database, ImageRecord, NewImage};
use crate::device::{Devices, GeoPoint, LocationProvider, PermissionStatus};
use crate::error::{Capability, GalleryError, Result};
use crate::storage::PhotoStorage;

/// Where a session gets its photos from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Camera,
    Library,
}

impl CaptureSource {
    pub fn capability(&self) -> Capability {
        match self {
            CaptureSource::Camera => Capability::Camera,
            CaptureSource::Library => Capability::MediaLibrary,
        }
    }
}

/// A photo held in memory until it is committed or discarded.
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    pub bytes: Vec<u8>,
    /// Library asset the photo was picked from
    pub asset: Option<PathBuf>,
    /// Location recorded in the photo itself
    pub embedded_location: Option<GeoPoint>,
}

#[derive(Debug, Clone)]
pub enum CaptureState {
    Idle,
    Captured(CapturedPhoto),
}

pub struct CaptureSession {
    source: CaptureSource,
    permission: PermissionStatus,
    state: CaptureState,
}

impl CaptureSession {
    pub fn new(source: CaptureSource) -> Self {
        Self {
            source,
            permission: PermissionStatus::Unknown,
            state: CaptureState::Idle,
        }
    }

    pub fn source(&self) -> CaptureSource {
        self.source
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn captured(&self) -> Option<&CapturedPhoto> {
        match &self.state {
            CaptureState::Captured(photo) => Some(photo),
            CaptureState::Idle => None,
        }
    }

    /// Ask the session's capability for access. Asked again on every call,
    /// so a permission granted later is picked up on the next screen focus.
    pub fn request_permission(&mut self, devices: &Devices) -> PermissionStatus {
        self.permission = match self.source {
            CaptureSource::Camera => devices.camera.request_permission(),
            CaptureSource::Library => devices.library.request_permission(),
        };
        tracing::debug!("{} permission: {:?}", self.source.capability(), self.permission);
        self.permission
    }

    fn ensure_granted(&self) -> Result<()> {
        if self.permission.is_granted() {
            Ok(())
        } else {
            Err(GalleryError::PermissionDenied(self.source.capability()))
        }
    }

    /// Take a photo with the camera. Returns false when the camera produced
    /// nothing, leaving the session idle.
    pub fn capture(&mut self, devices: &Devices) -> Result<bool> {
        self.ensure_granted()?;

        match devices.camera.capture_photo()? {
            Some(bytes) => {
                tracing::info!("Captured photo ({} bytes)", bytes.len());
                self.state = CaptureState::Captured(CapturedPhoto {
                    bytes,
                    asset: None,
                    embedded_location: None,
                });
                Ok(true)
            }
            None => {
                tracing::info!("Camera returned no photo");
                Ok(false)
            }
        }
    }

    /// Take a photo from the media library.
    pub fn pick(&mut self, devices: &Devices, asset: &Path) -> Result<()> {
        self.ensure_granted()?;

        let bytes = devices.library.load_asset(asset)?;
        let embedded_location = devices.library.asset_location(asset);
        tracing::info!("Picked {:?} ({} bytes)", asset, bytes.len());
        self.state = CaptureState::Captured(CapturedPhoto {
            bytes,
            asset: Some(asset.to_path_buf()),
            embedded_location,
        });
        Ok(())
    }

    pub fn discard(&mut self) {
        if matches!(self.state, CaptureState::Captured(_)) {
            tracing::debug!("Discarded captured photo");
        }
        self.state = CaptureState::Idle;
    }

    /// Store the captured photo: write it into the library, tag it with a
    /// timestamp and the best available location (0,0 when none), and insert
    /// the record. On failure the photo stays captured and any written file
    /// is removed.
    pub fn commit(
        &mut self,
        db: &Database,
        storage: &PhotoStorage,
        location: &dyn LocationProvider,
    ) -> Result<ImageRecord> {
        self.ensure_granted()?;
        let photo = match std::mem::replace(&mut self.state, CaptureState::Idle) {
            CaptureState::Captured(photo) => photo,
            CaptureState::Idle => return Err(GalleryError::NothingCaptured),
        };

        match store_photo(&photo, db, storage, location) {
            Ok(record) => Ok(record),
            Err(e) => {
                self.state = CaptureState::Captured(photo);
                Err(e)
            }
        }
    }
}

fn store_photo(
    photo: &CapturedPhoto,
    db: &Database,
    storage: &PhotoStorage,
    location: &dyn LocationProvider,
) -> Result<ImageRecord> {
    let now = Utc::now();
    let point = photo
        .embedded_location
        .or_else(|| location.current_location())
        .unwrap_or(GeoPoint::ORIGIN);

    let path = storage.save(&photo.bytes, now)?;
    let image = NewImage {
        path: path.to_string_lossy().into_owned(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        latitude: point.latitude,
        longitude: point.longitude,
    };

    match db.insert(&image) {
        Ok(id) => Ok(ImageRecord {
            id,
            path: image.path,
            timestamp: image.timestamp,
            latitude: image.latitude,
            longitude: image.longitude,
        }),
        Err(e) => {
            PhotoStorage::remove_best_effort(&path);
            Err(e)
        }
    }
}
