//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::Path;
use std::process::Output;

use anyhow::Result;

use crate::domain::{CloudRegistry, ModelConfig, RunResult};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Parameters for bootstrapping a controller.
pub struct BootstrapSpec<'a> {
    /// `key=value` pairs passed as `--config`.
    pub config: &'a [(&'a str, &'a str)],
    /// Optional `--bootstrap-series`.
    pub series: Option<&'a str>,
}

// ── Juju Client Ports ─────────────────────────────────────────────────────────

/// Read the current model's configuration.
#[allow(async_fn_in_trait)]
pub trait ModelConfigSource {
    async fn get_model_config(&self) -> Result<ModelConfig>;
}

/// Run a shell command on a controller machine.
#[allow(async_fn_in_trait)]
pub trait ControllerExec {
    /// Run `command` on `machine` of the controller model and return the
    /// per-machine results.
    async fn run_on_controller(&self, machine: &str, command: &str) -> Result<Vec<RunResult>>;
}

/// Read the client's cloud registry (`clouds.yaml`).
pub trait CloudRegistryReader {
    fn read_clouds(&self) -> Result<CloudRegistry>;
}

/// Identity of the cloud the client is configured against.
pub trait CloudEnvironment {
    fn cloud_name(&self) -> &str;
    fn provider(&self) -> &str;
    fn region(&self) -> &str;
}

/// Register a cloud definition with the client.
#[allow(async_fn_in_trait)]
pub trait CloudRegistrar {
    /// Add (or replace) cloud `name` from the YAML file at `path`.
    async fn add_cloud(&self, name: &str, path: &Path) -> Result<()>;
}

/// Controller bootstrap, log collection, and teardown.
#[allow(async_fn_in_trait)]
pub trait ControllerLifecycle {
    async fn bootstrap(&self, spec: &BootstrapSpec<'_>) -> Result<()>;
    /// Write the controller's debug log to `path`.
    async fn collect_logs(&self, path: &Path) -> Result<()>;
    async fn destroy(&self) -> Result<()>;
}

/// Generate simplestreams metadata for a directory of agent archives.
#[allow(async_fn_in_trait)]
pub trait ToolMetadataGenerator {
    async fn generate_tools(&self, agent_dir: &Path, agent_stream: &str) -> Result<()>;
}

/// Composite trait: everything the checks read from a client.
pub trait JujuClient:
    ModelConfigSource + ControllerExec + CloudRegistryReader + CloudEnvironment
{
}

/// Blanket implementation: any type implementing all four sub-traits is a `JujuClient`.
impl<T> JujuClient for T where
    T: ModelConfigSource + ControllerExec + CloudRegistryReader + CloudEnvironment
{
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Abstracts file hashing operations.
pub trait FileHasher {
    /// Compute the SHA-256 hex digest of a file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    fn sha256_file(&self, path: &Path) -> Result<Option<String>>;
}
