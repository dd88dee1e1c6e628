//! Shared test helpers: an in-memory juju client and output constructors.

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::Result;

use agent_metadata::application::ports::{
    BootstrapSpec, CloudEnvironment, CloudRegistrar, CloudRegistryReader, ControllerExec,
    ControllerLifecycle, FileHasher, ModelConfigSource, ProgressReporter, ToolMetadataGenerator,
};
use agent_metadata::domain::{CloudRegistry, ModelConfig, RunResult};

pub const SAMPLE_SHA256: &str =
    "ce3c940bd7523d307ae546d2f46e722538b0972fbb77abc5ba6bd639400827a8";
pub const CONTROLLER_URL: &str = "https://example.com/juju-2.0.1-xenial-amd64.tgz";
pub const ARCHIVE: &str = "juju-2.0.1-xenial-amd64.tgz";

// ── Output constructors ──────────────────────────────────────────────────────

/// `downloaded-tools.txt` as a controller writes it.
pub fn downloaded_tools(url: &str, sha256: &str) -> String {
    format!(
        r#"{{"version":"2.0.1-xenial-amd64","url":"{url}","sha256":"{sha256}","size":23539756}}"#
    )
}

/// One successful `juju run` result for machine 0.
pub fn machine_output(stdout: &str) -> Vec<RunResult> {
    vec![RunResult {
        machine_id: "0".to_string(),
        stdout: stdout.to_string(),
        ..RunResult::default()
    }]
}

/// Model config as `juju model-config --format json` reports it.
pub fn model_config(agent_metadata_url: &str) -> ModelConfig {
    serde_json::from_value(serde_json::json!({
        "agent-metadata-url": {"value": agent_metadata_url, "source": "model"},
        "agent-stream": {"value": "testing", "source": "model"},
    }))
    .unwrap_or_default()
}

// ── Fake juju client ─────────────────────────────────────────────────────────

/// In-memory juju client. Every port call is appended to `calls`.
pub struct FakeJuju {
    pub cloud: String,
    pub provider: String,
    pub region: String,
    pub model_config: ModelConfig,
    pub run_results: Result<Vec<RunResult>, String>,
    pub registry: RefCell<CloudRegistry>,
    pub calls: RefCell<Vec<String>>,
    pub bootstrap_fails: bool,
    pub destroy_fails: bool,
    pub logs_fail: bool,
    /// Drop `agent-stream` from clouds passed to `add_cloud`.
    pub corrupt_added_cloud: bool,
    pub bootstrap_config: RefCell<Vec<(String, String)>>,
    pub logs_written: RefCell<Vec<PathBuf>>,
}

impl Default for FakeJuju {
    fn default() -> Self {
        Self {
            cloud: "testcloud".to_string(),
            provider: "lxd".to_string(),
            region: "localhost".to_string(),
            model_config: ModelConfig::new(),
            run_results: Ok(Vec::new()),
            registry: RefCell::new(CloudRegistry::default()),
            calls: RefCell::new(Vec::new()),
            bootstrap_fails: false,
            destroy_fails: false,
            logs_fail: false,
            corrupt_added_cloud: false,
            bootstrap_config: RefCell::new(Vec::new()),
            logs_written: RefCell::new(Vec::new()),
        }
    }
}

impl FakeJuju {
    /// Controller reports `stdout` as the content of downloaded-tools.txt.
    pub fn with_controller_output(stdout: &str) -> Self {
        Self {
            run_results: Ok(machine_output(stdout)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

impl ModelConfigSource for FakeJuju {
    async fn get_model_config(&self) -> Result<ModelConfig> {
        self.record("model-config");
        Ok(self.model_config.clone())
    }
}

impl ControllerExec for FakeJuju {
    async fn run_on_controller(&self, machine: &str, command: &str) -> Result<Vec<RunResult>> {
        self.record(format!("run {machine} {command}"));
        self.run_results.clone().map_err(|e| anyhow::anyhow!("{e}"))
    }
}

impl CloudRegistryReader for FakeJuju {
    fn read_clouds(&self) -> Result<CloudRegistry> {
        Ok(self.registry.borrow().clone())
    }
}

impl CloudEnvironment for FakeJuju {
    fn cloud_name(&self) -> &str {
        &self.cloud
    }

    fn provider(&self) -> &str {
        &self.provider
    }

    fn region(&self) -> &str {
        &self.region
    }
}

impl CloudRegistrar for FakeJuju {
    async fn add_cloud(&self, name: &str, path: &Path) -> Result<()> {
        self.record(format!("add-cloud {name}"));
        let content = std::fs::read_to_string(path)?;
        let added: CloudRegistry = serde_yaml::from_str(&content)?;
        let mut registry = self.registry.borrow_mut();
        for (cloud, mut entry) in added.clouds {
            if self.corrupt_added_cloud {
                entry.config.agent_stream = None;
            }
            registry.clouds.insert(cloud, entry);
        }
        Ok(())
    }
}

impl ControllerLifecycle for FakeJuju {
    async fn bootstrap(&self, spec: &BootstrapSpec<'_>) -> Result<()> {
        self.record("bootstrap");
        *self.bootstrap_config.borrow_mut() = spec
            .config
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        if self.bootstrap_fails {
            anyhow::bail!("ERROR failed to bootstrap model");
        }
        Ok(())
    }

    async fn collect_logs(&self, path: &Path) -> Result<()> {
        self.record("debug-log");
        if self.logs_fail {
            anyhow::bail!("ERROR controller unreachable");
        }
        self.logs_written.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    async fn destroy(&self) -> Result<()> {
        self.record("kill-controller");
        if self.destroy_fails {
            anyhow::bail!("ERROR controller not found");
        }
        Ok(())
    }
}

/// Metadata generator that does nothing.
pub struct NoopGenerator;

impl ToolMetadataGenerator for NoopGenerator {
    async fn generate_tools(&self, _: &Path, _: &str) -> Result<()> {
        Ok(())
    }
}

// ── Hasher and reporter doubles ──────────────────────────────────────────────

/// Returns a fixed digest (or "not found") and records the paths asked for.
pub struct FixedHasher {
    digest: Option<String>,
    pub paths: RefCell<Vec<PathBuf>>,
}

impl FixedHasher {
    pub fn new(digest: &str) -> Self {
        Self {
            digest: Some(digest.to_string()),
            paths: RefCell::new(Vec::new()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            digest: None,
            paths: RefCell::new(Vec::new()),
        }
    }
}

impl FileHasher for FixedHasher {
    fn sha256_file(&self, path: &Path) -> Result<Option<String>> {
        self.paths.borrow_mut().push(path.to_path_buf());
        Ok(self.digest.clone())
    }
}

/// Hasher whose every call fails.
pub struct BrokenHasher;

impl FileHasher for BrokenHasher {
    fn sha256_file(&self, path: &Path) -> Result<Option<String>> {
        anyhow::bail!("permission denied: {}", path.display())
    }
}

/// Collects every reported message, prefixed by its kind.
#[derive(Default)]
pub struct RecordingReporter {
    pub messages: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter_map(|m| m.strip_prefix("warn: ").map(ToString::to_string))
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(format!("step: {message}"));
    }

    fn success(&self, message: &str) {
        self.messages.borrow_mut().push(format!("success: {message}"));
    }

    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(format!("warn: {message}"));
    }
}
