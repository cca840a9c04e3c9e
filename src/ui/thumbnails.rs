//! Background image decoding for terminal rendering.

use image::{imageops::FilterType, DynamicImage};
use ratatui_image::{picker::Picker, protocol::StatefulProtocol};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use crate::config::ImageProtocol;

/// Decodes images on short-lived threads and keeps the encoded terminal
/// protocols around, keyed by path.
pub struct ImageCache {
    /// Image picker for protocol detection
    picker: Option<Picker>,
    /// Pixel size images are scaled down to
    pixel_size: u32,
    filter: FilterType,
    cache: HashMap<PathBuf, StatefulProtocol>,
    /// Paths currently being decoded
    loading: HashSet<PathBuf>,
    receiver: mpsc::Receiver<(PathBuf, DynamicImage)>,
    sender: mpsc::Sender<(PathBuf, DynamicImage)>,
}

impl ImageCache {
    pub fn new(protocol: ImageProtocol, pixel_size: u32, filter: FilterType) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            picker: create_picker(protocol),
            pixel_size,
            filter,
            cache: HashMap::new(),
            loading: HashSet::new(),
            receiver,
            sender,
        }
    }

    pub fn is_available(&self) -> bool {
        self.picker.is_some()
    }

    /// Move finished decodes into the cache. Call once per frame.
    pub fn poll_async_loads(&mut self) {
        while let Ok((path, dyn_img)) = self.receiver.try_recv() {
            self.loading.remove(&path);
            if let Some(ref mut picker) = self.picker {
                let protocol = picker.new_resize_protocol(dyn_img);
                self.cache.insert(path, protocol);
            }
        }
    }

    /// The encoded image for `path`, starting a background decode on a miss.
    pub fn load(&mut self, path: &Path) -> Option<&mut StatefulProtocol> {
        if self.cache.contains_key(path) {
            return self.cache.get_mut(path);
        }

        if !self.loading.contains(path) && self.picker.is_some() {
            self.loading.insert(path.to_path_buf());
            let path_clone = path.to_path_buf();
            let sender = self.sender.clone();
            let size = self.pixel_size;
            let filter = self.filter;

            std::thread::spawn(move || {
                match image::ImageReader::open(&path_clone)
                    .and_then(|r| r.with_guessed_format())
                    .map_err(image::ImageError::IoError)
                    .and_then(|r| r.decode())
                {
                    Ok(img) => {
                        let resized = img.resize(size, size, filter);
                        let _ = sender.send((path_clone, resized));
                    }
                    Err(e) => tracing::debug!("Failed to decode {:?}: {}", path_clone, e),
                }
            });
        }

        None
    }

    /// Decode in-memory bytes right away under `key`. Returns false when the
    /// bytes are not a decodable image.
    pub fn insert_bytes(&mut self, key: &Path, bytes: &[u8]) -> bool {
        let Some(ref mut picker) = self.picker else {
            return false;
        };
        match image::load_from_memory(bytes) {
            Ok(img) => {
                let resized = img.resize(self.pixel_size, self.pixel_size, self.filter);
                self.cache.insert(key.to_path_buf(), picker.new_resize_protocol(resized));
                true
            }
            Err(e) => {
                tracing::debug!("Captured bytes are not a decodable image: {}", e);
                false
            }
        }
    }

    pub fn is_loading(&self, path: &Path) -> bool {
        self.loading.contains(path)
    }

    pub fn remove(&mut self, path: &Path) {
        self.cache.remove(path);
    }
}

fn create_picker(protocol: ImageProtocol) -> Option<Picker> {
    match protocol {
        ImageProtocol::None => None,
        ImageProtocol::Auto => Picker::from_query_stdio().ok(),
    }
}
