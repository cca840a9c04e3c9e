use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default)]
    pub library: LibraryConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub trash: TrashConfig,
}

/// Where captured and imported photos are kept, and how the grid shows them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_library_path")]
    pub path: PathBuf,

    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
}

fn default_library_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("snapshelf/photos")
}

fn default_grid_columns() -> usize {
    3
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: default_library_path(),
            grid_columns: default_grid_columns(),
        }
    }
}

/// External capture command. `{output}` is replaced with the file the command
/// must write the photo to, e.g. `["fswebcam", "--no-banner", "{output}"]`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CameraConfig {
    #[serde(default)]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Directory browsed as the media library
    #[serde(default = "default_import_directory")]
    pub directory: PathBuf,

    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

fn default_import_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_image_extensions() -> Vec<String> {
    vec![
        "jpg".to_string(),
        "jpeg".to_string(),
        "png".to_string(),
        "gif".to_string(),
        "webp".to_string(),
        "bmp".to_string(),
        "tiff".to_string(),
    ]
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            directory: default_import_directory(),
            image_extensions: default_image_extensions(),
        }
    }
}

/// Fixed position reported as the device location. Leave unset when the
/// machine has no meaningful location; photos are then tagged 0,0.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocationConfig {
    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageProtocol {
    #[default]
    Auto,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub protocol: ImageProtocol,

    /// Pixel size thumbnails are decoded to for the grid
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Pixel size the full-screen viewer decodes to
    #[serde(default = "default_viewer_size")]
    pub viewer_size: u32,
}

fn default_thumbnail_size() -> u32 {
    256
}

fn default_viewer_size() -> u32 {
    2048
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            protocol: ImageProtocol::default(),
            thumbnail_size: default_thumbnail_size(),
            viewer_size: default_viewer_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrashConfig {
    /// When disabled, deleting a photo removes its file immediately
    #[serde(default = "default_trash_enabled")]
    pub enabled: bool,

    #[serde(default = "default_trash_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_age_days")]
    pub max_age_days: u32,
}

fn default_trash_enabled() -> bool {
    true
}

fn default_trash_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join("snapshelf/.trash")
}

fn default_max_age_days() -> u32 {
    30
}

impl Default for TrashConfig {
    fn default() -> Self {
        Self {
            enabled: default_trash_enabled(),
            path: default_trash_path(),
            max_age_days: default_max_age_days(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapshelf")
        .join("images.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            library: LibraryConfig::default(),
            camera: CameraConfig::default(),
            import: ImportConfig::default(),
            location: LocationConfig::default(),
            preview: PreviewConfig::default(),
            trash: TrashConfig::default(),
        }
    }
}

impl Config {
    /// Load from `SNAPSHELF_CONFIG` or the default location, writing a default
    /// config file on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("snapshelf")
    }

    fn config_path() -> PathBuf {
        match std::env::var_os("SNAPSHELF_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => Self::config_dir().join("config.toml"),
        }
    }
}
