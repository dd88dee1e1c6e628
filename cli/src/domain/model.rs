//! Model configuration as reported by `juju model-config --format json`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::AssertionError;

/// Key under which the bootstrap metadata location is stored.
pub const AGENT_METADATA_URL: &str = "agent-metadata-url";

/// One model setting: `{"value": ..., "source": "model"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSetting {
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ConfigSetting {
    /// The value when it is a JSON string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

pub type ModelConfig = BTreeMap<String, ConfigSetting>;

/// Check that the model's `agent-metadata-url` equals `expected` exactly.
///
/// # Errors
///
/// Returns [`AssertionError::MetadataUrlMissing`] when the key is absent and
/// [`AssertionError::MetadataUrlMismatch`] when the value differs.
pub fn check_agent_metadata_url(config: &ModelConfig, expected: &str) -> Result<(), AssertionError> {
    let setting = config
        .get(AGENT_METADATA_URL)
        .ok_or(AssertionError::MetadataUrlMissing)?;
    match setting.as_str() {
        Some(actual) if actual == expected => Ok(()),
        // Non-string values never match.
        _ => Err(AssertionError::MetadataUrlMismatch {
            expected: expected.to_string(),
            actual: setting
                .as_str()
                .map_or_else(|| setting.value.to_string(), ToString::to_string),
        }),
    }
}
