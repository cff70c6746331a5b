//! File logging via `tracing`

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Installs a file subscriber when `path` is given. The filter comes from
/// `RUST_LOG` and defaults to `info`.
pub fn init(path: Option<&Path>) -> io::Result<bool> {
    let Some(path) = path else {
        return Ok(false);
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| io::Error::other(format!("logging init failed: {e}")))?;

    Ok(true)
}
