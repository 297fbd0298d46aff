use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter
pub const LOG_ENV: &str = "FROSTLAUNCH_LOG";

pub fn log_path() -> PathBuf {
    directories::ProjectDirs::from("org", "frostlaunch", "frostlaunch")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("frostlaunch.log")
}

/// Send tracing output to the log file. The terminal belongs to the
/// selector, so nothing is logged to stdout or stderr. Any failure leaves
/// logging off.
pub fn init(level: &str) {
    let path = log_path();
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
