//! Optional trace file
//!
//! stdout belongs to the monitoring system, so diagnostics only go anywhere
//! when `--trace <FILE>` is given.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

/// Append debug-level traces to `path`
pub fn init(path: &Path) -> Result<(), String> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("unable to open trace file {}: {}", path.display(), e))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(Level::DEBUG)
        .try_init()
        .map_err(|e| format!("unable to start tracing: {}", e))
}
