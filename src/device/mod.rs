//! Device capabilities consumed by the capture and import flows.
//!
//! The flows only see these traits; the desktop implementations live in the
//! submodules and are selected from the config by [`Devices::from_config`].

mod camera;
mod library;
mod location;

use std::path::{Path, PathBuf};

pub use camera::CommandCamera;
pub use library::{discover_images, read_gps, DirectoryLibrary};
pub use location::{FixedLocation, NoLocation};

use crate::config::Config;
use crate::error::Result;

/// Outcome of asking for access to a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Unknown,
    Denied,
    Granted,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        *self == PermissionStatus::Granted
    }
}

/// A position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Written when no location is available.
    pub const ORIGIN: GeoPoint = GeoPoint { latitude: 0.0, longitude: 0.0 };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

pub trait Camera {
    fn request_permission(&self) -> PermissionStatus;

    /// Take a photo. `Ok(None)` means the camera produced nothing.
    fn capture_photo(&self) -> Result<Option<Vec<u8>>>;
}

pub trait MediaLibrary {
    fn request_permission(&self) -> PermissionStatus;

    /// Photos the user can pick from.
    fn list_assets(&self) -> Result<Vec<PathBuf>>;

    fn load_asset(&self, asset: &Path) -> Result<Vec<u8>>;

    /// Location embedded in the asset itself, if any.
    fn asset_location(&self, _asset: &Path) -> Option<GeoPoint> {
        None
    }
}

pub trait LocationProvider {
    fn current_location(&self) -> Option<GeoPoint>;
}

/// The capabilities the application runs against.
pub struct Devices {
    pub camera: Box<dyn Camera>,
    pub library: Box<dyn MediaLibrary>,
    pub location: Box<dyn LocationProvider>,
}

impl Devices {
    pub fn from_config(config: &Config) -> Self {
        let camera = CommandCamera::new(config.camera.command.clone());
        let library = DirectoryLibrary::new(
            config.import.directory.clone(),
            config.import.image_extensions.clone(),
        );
        let location: Box<dyn LocationProvider> =
            match (config.location.latitude, config.location.longitude) {
                (Some(latitude), Some(longitude)) => {
                    Box::new(FixedLocation::new(GeoPoint::new(latitude, longitude)))
                }
                _ => Box::new(NoLocation),
            };

        Self {
            camera: Box::new(camera),
            library: Box::new(library),
            location,
        }
    }
}
