//! Tracing setup. The UI owns the terminal, so events go to the systemd
//! journal when one is reachable and to a daily log file otherwise.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

/// Environment variable holding the filter directives, e.g. `snapshelf=debug`.
const FILTER_ENV: &str = "SNAPSHELF_LOG";
const DEFAULT_FILTER: &str = "info";
const LOG_FILE: &str = "snapshelf.log";

/// Keeps the file writer thread alive for the rest of the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Where log events end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    Journald,
    File(PathBuf),
}

/// Install the global subscriber. `log_dir` is only used when the journal
/// is not available; `None` picks the platform data directory.
pub fn init(log_dir: Option<PathBuf>) -> Result<LogSink> {
    let (layer, sink) = match journald_layer() {
        Some(layer) => (layer, LogSink::Journald),
        None => {
            let dir = log_dir.unwrap_or_else(default_log_dir);
            (file_layer(&dir)?, LogSink::File(dir))
        }
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(env_filter()))
        .try_init()
        .context("A global subscriber is already installed")?;

    tracing::info!(?sink, "Logging initialized");
    Ok(sink)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snapshelf")
        .join("logs")
}

#[cfg(target_os = "linux")]
fn journald_layer() -> Option<BoxedLayer> {
    tracing_journald::layer().ok().map(|layer| Box::new(layer) as BoxedLayer)
}

#[cfg(not(target_os = "linux"))]
fn journald_layer() -> Option<BoxedLayer> {
    None
}

fn file_layer(dir: &Path) -> Result<BoxedLayer> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE));
    // Only the first guard is kept; init runs once per process
    let _ = FILE_GUARD.set(guard);

    Ok(Box::new(fmt::layer().with_writer(writer).with_ansi(false)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_layer_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("nested").join("logs");

        file_layer(&logs).unwrap();

        assert!(logs.is_dir());
    }

    #[test]
    fn test_default_log_dir_is_app_specific() {
        let dir = default_log_dir();
        assert!(dir.ends_with(Path::new("snapshelf").join("logs")));
    }
}
