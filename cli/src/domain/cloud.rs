//! Cloud registry types and the cloud descriptor built for `add-cloud`.
//!
//! Pure data and comparisons: no I/O.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::AssertionError;

/// Scheme prefixed to local metadata paths.
pub const FILE_SCHEME: &str = "file://";

/// Per-region settings (`endpoint`, ...). Empty for most local clouds.
pub type RegionSettings = BTreeMap<String, serde_yaml::Value>;

/// Provider-specific `config` block of a cloud entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudConfig {
    #[serde(
        rename = "agent-metadata-url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub agent_metadata_url: Option<String>,

    #[serde(
        rename = "agent-stream",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub agent_stream: Option<String>,

    /// Any other config keys, kept so that comparisons see them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl CloudConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agent_metadata_url.is_none() && self.agent_stream.is_none() && self.extra.is_empty()
    }
}

/// One entry under `clouds:` in `clouds.yaml`, or the output of `juju show-cloud`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudEntry {
    /// Provider type, e.g. `lxd`, `maas`, `ec2`.
    #[serde(rename = "type")]
    pub provider: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub regions: BTreeMap<String, RegionSettings>,

    #[serde(default, skip_serializing_if = "CloudConfig::is_empty")]
    pub config: CloudConfig,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The client's cloud registry: `clouds -> {name -> entry}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudRegistry {
    #[serde(default)]
    pub clouds: BTreeMap<String, CloudEntry>,
}

impl CloudRegistry {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CloudEntry> {
        self.clouds.get(name)
    }
}

/// A named cloud definition pointing agents at local tool metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudDescriptor {
    pub name: String,
    pub entry: CloudEntry,
}

impl CloudDescriptor {
    /// Build a descriptor for `name` with a single region and a `file://`
    /// metadata URL.
    #[must_use]
    pub fn new(
        name: &str,
        provider: &str,
        region: &str,
        agent_metadata_url: &str,
        agent_stream: &str,
    ) -> Self {
        let mut regions = BTreeMap::new();
        regions.insert(region.to_string(), RegionSettings::new());
        Self {
            name: name.to_string(),
            entry: CloudEntry {
                provider: provider.to_string(),
                regions,
                config: CloudConfig {
                    agent_metadata_url: Some(format!("{FILE_SCHEME}{agent_metadata_url}")),
                    agent_stream: Some(agent_stream.to_string()),
                    extra: BTreeMap::new(),
                },
                extra: BTreeMap::new(),
            },
        }
    }

    /// Wrap the descriptor in the `clouds:` document accepted by `add-cloud`.
    #[must_use]
    pub fn to_registry(&self) -> CloudRegistry {
        let mut clouds = BTreeMap::new();
        clouds.insert(self.name.clone(), self.entry.clone());
        CloudRegistry { clouds }
    }
}

/// Check that `registry` holds an entry for `name` structurally equal to `expected`.
///
/// # Errors
///
/// Returns [`AssertionError::CloudNotFound`] when the entry is absent and
/// [`AssertionError::CloudMismatch`] when any field differs.
pub fn check_cloud_entry(
    registry: &CloudRegistry,
    name: &str,
    expected: &CloudEntry,
) -> Result<(), AssertionError> {
    let actual = registry.get(name).ok_or_else(|| AssertionError::CloudNotFound {
        name: name.to_string(),
    })?;
    if actual != expected {
        return Err(AssertionError::CloudMismatch {
            name: name.to_string(),
            expected: render(expected),
            actual: render(actual),
        });
    }
    Ok(())
}

fn render(entry: &CloudEntry) -> String {
    serde_json::to_string(entry).unwrap_or_else(|_| format!("{entry:?}"))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
