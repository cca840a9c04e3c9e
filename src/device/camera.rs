use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{Camera, PermissionStatus};
use crate::error::{GalleryError, Result};

const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Camera backed by an external capture program such as `fswebcam` or
/// `libcamera-still`.
///
/// The program receives a scratch file path in place of `{output}` (or as its
/// last argument when the placeholder is absent) and must write the photo
/// there. Access is granted when the program can be found.
pub struct CommandCamera {
    command: Vec<String>,
    scratch_dir: PathBuf,
}

impl CommandCamera {
    pub fn new(command: Vec<String>) -> Self {
        Self {
            command,
            scratch_dir: std::env::temp_dir(),
        }
    }

    fn scratch_file(&self) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        self.scratch_dir
            .join(format!("snapshelf-capture-{}-{}.jpg", std::process::id(), seq))
    }

    fn build_args(&self, output: &Path) -> Vec<String> {
        let output = output.to_string_lossy();
        let mut args: Vec<String> = self.command[1..]
            .iter()
            .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, &output))
            .collect();
        if !self.command[1..].iter().any(|arg| arg.contains(OUTPUT_PLACEHOLDER)) {
            args.push(output.into_owned());
        }
        args
    }
}

/// Locate `program` the way a shell would.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|path| path.is_file())
}

impl Camera for CommandCamera {
    fn request_permission(&self) -> PermissionStatus {
        let Some(program) = self.command.first() else {
            tracing::warn!("No capture command configured; camera unavailable");
            return PermissionStatus::Denied;
        };

        match resolve_program(program) {
            Some(path) => {
                tracing::debug!("Capture program resolved to {:?}", path);
                PermissionStatus::Granted
            }
            None => {
                tracing::warn!("Capture program {} not found", program);
                PermissionStatus::Denied
            }
        }
    }

    fn capture_photo(&self) -> Result<Option<Vec<u8>>> {
        let Some(program) = self.command.first() else {
            return Err(GalleryError::CaptureFailed("no capture command configured".to_string()));
        };

        let output_path = self.scratch_file();
        let args = self.build_args(&output_path);
        tracing::debug!("Running capture command {} {:?}", program, args);

        let output = Command::new(program)
            .args(&args)
            .output()
            .map_err(|e| GalleryError::CaptureFailed(format!("{}: {}", program, e)))?;

        if !output.status.success() {
            let _ = std::fs::remove_file(&output_path);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GalleryError::CaptureFailed(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        let bytes = match std::fs::read(&output_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(GalleryError::file(&output_path, e)),
        };
        if let Err(e) = std::fs::remove_file(&output_path) {
            tracing::warn!("Failed to remove scratch file {:?}: {}", output_path, e);
        }

        Ok((!bytes.is_empty()).then_some(bytes))
    }
}
