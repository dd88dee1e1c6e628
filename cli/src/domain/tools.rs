//! Agent tool records and the deployed-tool comparison.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::cloud::FILE_SCHEME;
use crate::domain::error::AssertionError;

/// Command run on controller machine 0 to read the tools it downloaded.
pub const DOWNLOADED_TOOLS_CMD: &str = "cat /var/lib/juju/tools/machine-0/downloaded-tools.txt";

/// Machine the controller tools are read from.
pub const CONTROLLER_MACHINE: &str = "0";

/// A `(url, sha256)` pair describing an agent archive.
///
/// Either field may be absent; see [`ToolRecord::is_complete`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRecord {
    pub url: Option<String>,
    pub sha256: Option<String>,
}

impl ToolRecord {
    #[must_use]
    pub fn new(url: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            sha256: Some(sha256.into()),
        }
    }

    /// The `(None, None)` record produced when no archive was found.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    /// Both fields present and non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        non_empty(self.url.as_deref()).is_some() && non_empty(self.sha256.as_deref()).is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Typed view of `downloaded-tools.txt` on a controller machine.
///
/// ```json
/// {"version":"2.0.1-xenial-amd64","url":"https://…/juju-2.0.1-xenial-amd64.tgz","sha256":"…","size":23539756}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DownloadedTools {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl DownloadedTools {
    /// Keep only `url` and `sha256`, failing if either is absent.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::MissingField`] naming the first absent field.
    pub fn into_record(self) -> Result<ToolRecord, AssertionError> {
        let url = self.url.ok_or(AssertionError::MissingField("url"))?;
        let sha256 = self.sha256.ok_or(AssertionError::MissingField("sha256"))?;
        Ok(ToolRecord::new(url, sha256))
    }
}

/// One machine's result from `juju run --format json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunResult {
    #[serde(default)]
    pub machine_id: String,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub return_code: i32,
}

/// Last path segment of a URL, e.g. `juju-2.0.1-xenial-amd64.tgz`.
///
/// # Errors
///
/// Returns [`AssertionError::InvalidToolUrl`] when the URL ends in `/` or is empty.
pub fn archive_name(url: &str) -> Result<&str, AssertionError> {
    let name = url.rsplit('/').next().unwrap_or_default();
    if name.is_empty() {
        return Err(AssertionError::InvalidToolUrl(url.to_string()));
    }
    Ok(name)
}

/// `agent_dir/tools/<stream>/<archive>`: where the staged archive lives.
#[must_use]
pub fn local_tool_path(agent_dir: &Path, agent_stream: &str, archive: &str) -> PathBuf {
    agent_dir.join("tools").join(agent_stream).join(archive)
}

/// `file://` URL for a local path.
#[must_use]
pub fn file_url(path: &Path) -> String {
    format!("{FILE_SCHEME}{}", path.display())
}

/// Compare the locally derived record with the one the controller reports.
///
/// Missing values fail first, then the URL, then the checksum.
///
/// # Errors
///
/// Returns the first [`AssertionError`] found.
pub fn check_deployed_tool(
    local: &ToolRecord,
    controller: &ToolRecord,
) -> Result<(), AssertionError> {
    if !controller.is_complete() {
        return Err(AssertionError::ControllerToolMissing {
            url: controller.url.clone(),
            sha256: controller.sha256.clone(),
        });
    }
    if !local.is_complete() {
        return Err(AssertionError::LocalToolMissing {
            url: local.url.clone(),
            sha256: local.sha256.clone(),
        });
    }
    if local.url != controller.url {
        return Err(AssertionError::UrlMismatch {
            local: local.url.clone().unwrap_or_default(),
            controller: controller.url.clone().unwrap_or_default(),
        });
    }
    if local.sha256 != controller.sha256 {
        return Err(AssertionError::Sha256Mismatch {
            local: local.sha256.clone().unwrap_or_default(),
            controller: controller.sha256.clone().unwrap_or_default(),
        });
    }
    Ok(())
}

/// Lower-case hex encoding of a digest.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}

// ── Unit tests ───────────────────────────────────────────────────────────────
