use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{GeoPoint, MediaLibrary, PermissionStatus};
use crate::error::{GalleryError, Result};

/// A directory of pictures used as the media library.
pub struct DirectoryLibrary {
    directory: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryLibrary {
    pub fn new(directory: PathBuf, extensions: Vec<String>) -> Self {
        Self { directory, extensions }
    }
}

impl MediaLibrary for DirectoryLibrary {
    fn request_permission(&self) -> PermissionStatus {
        match std::fs::read_dir(&self.directory) {
            Ok(_) => PermissionStatus::Granted,
            Err(e) => {
                tracing::warn!("Media library {:?} not readable: {}", self.directory, e);
                PermissionStatus::Denied
            }
        }
    }

    fn list_assets(&self) -> Result<Vec<PathBuf>> {
        Ok(discover_images(&self.directory, &self.extensions))
    }

    fn load_asset(&self, asset: &Path) -> Result<Vec<u8>> {
        std::fs::read(asset).map_err(|e| GalleryError::file(asset, e))
    }

    fn asset_location(&self, asset: &Path) -> Option<GeoPoint> {
        read_gps(asset)
    }
}

/// Image files under `directory` (recursively) with one of `extensions`,
/// sorted by path.
pub fn discover_images(directory: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let mut images = Vec::new();

    for entry in WalkDir::new(directory)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension() {
                let ext_lower = ext.to_string_lossy().to_lowercase();
                if extensions.iter().any(|e| e.to_lowercase() == ext_lower) {
                    images.push(path.to_path_buf());
                }
            }
        }
    }

    images.sort();
    images
}

/// GPS position from the EXIF block of an image, if it carries one.
pub fn read_gps(path: &Path) -> Option<GeoPoint> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;

    let lat_field = exif.get_field(exif::Tag::GPSLatitude, exif::In::PRIMARY)?;
    let lat_ref = exif.get_field(exif::Tag::GPSLatitudeRef, exif::In::PRIMARY)?;
    let lon_field = exif.get_field(exif::Tag::GPSLongitude, exif::In::PRIMARY)?;
    let lon_ref = exif.get_field(exif::Tag::GPSLongitudeRef, exif::In::PRIMARY)?;

    let (exif::Value::Rational(lat_vals), exif::Value::Rational(lon_vals)) =
        (&lat_field.value, &lon_field.value)
    else {
        return None;
    };
    if lat_vals.len() < 3 || lon_vals.len() < 3 {
        return None;
    }

    let lat = rationals_to_degrees(lat_vals)?;
    let lon = rationals_to_degrees(lon_vals)?;

    let lat_ref_str = lat_ref.display_value().to_string();
    let lon_ref_str = lon_ref.display_value().to_string();

    Some(GeoPoint::new(
        if lat_ref_str.contains('S') { -lat } else { lat },
        if lon_ref_str.contains('W') { -lon } else { lon },
    ))
}

/// Degrees from an EXIF degrees/minutes/seconds triple. A zero denominator
/// makes the whole position unusable.
fn rationals_to_degrees(values: &[exif::Rational]) -> Option<f64> {
    let mut parts = [0.0; 3];
    for (part, value) in parts.iter_mut().zip(values) {
        if value.denom == 0 {
            return None;
        }
        *part = value.num as f64 / value.denom as f64;
    }
    Some(dms_to_decimal(parts[0], parts[1], parts[2]))
}

fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64) -> f64 {
    degrees + minutes / 60.0 + seconds / 3600.0
}
