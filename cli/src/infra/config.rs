//! Environment-derived configuration: juju data directory and agent file checks.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::ConfigError;

/// Environment variable overriding the juju client data directory.
pub const JUJU_DATA_ENV: &str = "JUJU_DATA";

/// Resolve the juju client data directory from the process environment.
///
/// # Errors
///
/// Returns an error if `JUJU_DATA` is unset and no data directory can be determined.
pub fn juju_data_dir() -> Result<PathBuf> {
    juju_data_dir_from(std::env::var_os(JUJU_DATA_ENV))
}

/// `JUJU_DATA` when set and non-empty, else `<data dir>/juju`
/// (`~/.local/share/juju` on Linux).
///
/// # Errors
///
/// Returns an error if no data directory can be determined.
pub fn juju_data_dir_from(juju_data: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = juju_data.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|d| d.join("juju"))
        .ok_or_else(|| anyhow::anyhow!("cannot determine juju data directory; set {JUJU_DATA_ENV}"))
}

/// Check that the agent archive exists and is a regular file.
///
/// # Errors
///
/// Returns [`ConfigError::AgentFileNotFound`] or [`ConfigError::AgentFileNotRegular`],
/// and [`ConfigError::AgentFileUnreadable`] for any other I/O failure.
pub fn check_agent_file(path: &Path) -> Result<(), ConfigError> {
    let display = path.display().to_string();
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(ConfigError::AgentFileNotRegular(display)),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ConfigError::AgentFileNotFound(display)),
        Err(source) => Err(ConfigError::AgentFileUnreadable {
            path: display,
            source,
        }),
    }
}
