//! Run configuration for an assessment.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;

use crate::domain::error::ConfigError;

/// Stream used when `--agent-stream` is not given.
pub const DEFAULT_AGENT_STREAM: &str = "testing";

/// Which checks to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Bootstrap with `agent-metadata-url` and verify.
    Metadata,
    /// Register a cloud carrying the metadata URL, then bootstrap and verify.
    AddCloud,
    /// Both, in that order.
    All,
}

impl Scenario {
    #[must_use]
    pub fn includes_metadata(self) -> bool {
        matches!(self, Self::Metadata | Self::All)
    }

    #[must_use]
    pub fn includes_add_cloud(self) -> bool {
        matches!(self, Self::AddCloud | Self::All)
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct AssessConfig {
    /// Cloud (environment) to bootstrap against.
    pub env: String,
    /// Path or name of the juju binary.
    pub juju_bin: String,
    /// Directory for collected controller logs.
    pub logs: Option<PathBuf>,
    /// Controller name, also used as the default model name.
    pub controller: String,
    /// Local agent archive to stage.
    pub agent_file: PathBuf,
    pub agent_stream: String,
    /// Region override; otherwise the cloud's first region.
    pub region: Option<String>,
    /// Series passed to `--bootstrap-series`.
    pub series: Option<String>,
    /// Leave controllers running after the checks.
    pub keep_env: bool,
    pub scenario: Scenario,
    /// Forward `--debug` to juju.
    pub debug: bool,
}

impl AssessConfig {
    /// The model the checks read config from.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.controller
    }

    /// Controller used by the add-cloud scenario. A kept metadata controller
    /// still exists when add-cloud bootstraps, so it gets a distinct name.
    #[must_use]
    pub fn add_cloud_controller(&self) -> String {
        if self.keep_env && self.scenario.includes_metadata() {
            format!("{}-add-cloud", self.controller)
        } else {
            self.controller.clone()
        }
    }
}

/// Validate an agent stream name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidAgentStream`] for empty names or names
/// containing a path separator or `..`.
pub fn validate_agent_stream(stream: &str) -> Result<(), ConfigError> {
    if stream.is_empty() || stream.contains(['/', '\\']) || stream == "." || stream == ".." {
        return Err(ConfigError::InvalidAgentStream(stream.to_string()));
    }
    Ok(())
}
