//! Infrastructure implementation of the juju client ports.
//!
//! `JujuCli<R>` routes every juju CLI call through a `CommandRunner` and
//! reads the client's `clouds.yaml` directly from the juju data directory.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{
    BootstrapSpec, CloudEnvironment, CloudRegistrar, CloudRegistryReader, CommandRunner,
    ControllerExec, ControllerLifecycle, ModelConfigSource, ToolMetadataGenerator,
};
use crate::domain::{CloudEntry, CloudRegistry, ModelConfig, RunResult};
use crate::infra::command_runner::{DEFAULT_EXEC_TIMEOUT, LIFECYCLE_TIMEOUT};

/// Cloud, provider type, and region the client targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudIdentity {
    pub name: String,
    pub provider: String,
    pub region: String,
}

impl CloudIdentity {
    /// Resolve the identity from `juju show-cloud` output.
    ///
    /// # Errors
    ///
    /// Returns an error if no region is given and the cloud defines none.
    pub fn from_entry(name: &str, entry: &CloudEntry, region: Option<&str>) -> Result<Self> {
        let region = match region {
            Some(r) => r.to_string(),
            None => entry
                .regions
                .keys()
                .next()
                .cloned()
                .with_context(|| format!("cloud {name} defines no regions; pass --region"))?,
        };
        Ok(Self {
            name: name.to_string(),
            provider: entry.provider.clone(),
            region,
        })
    }
}

/// Where and how the juju binary runs.
#[derive(Debug, Clone)]
pub struct JujuSettings {
    pub juju_bin: String,
    pub controller: String,
    pub model: String,
    /// Client data directory holding `clouds.yaml`.
    pub juju_data: PathBuf,
    /// Pass `--debug` to every command.
    pub debug: bool,
}

/// Infrastructure adapter that drives the `juju` CLI.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct JujuCli<R: CommandRunner> {
    runner: R,
    settings: JujuSettings,
    cloud: CloudIdentity,
}

impl<R: CommandRunner> JujuCli<R> {
    pub fn new(runner: R, settings: JujuSettings, cloud: CloudIdentity) -> Self {
        Self {
            runner,
            settings,
            cloud,
        }
    }

    /// Build a client for cloud `env`, looking its type and regions up with
    /// `juju show-cloud`.
    ///
    /// # Errors
    ///
    /// Returns an error if `show-cloud` fails or its output cannot be parsed.
    pub async fn discover(
        runner: R,
        settings: JujuSettings,
        env: &str,
        region: Option<&str>,
    ) -> Result<Self> {
        let output = juju(
            &runner,
            &settings,
            &["show-cloud"],
            &[env, "--format", "yaml"],
            None,
        )
        .await?;
        let entry: CloudEntry = serde_yaml::from_slice(&output.stdout)
            .with_context(|| format!("parsing juju show-cloud {env}"))?;
        let cloud = CloudIdentity::from_entry(env, &entry, region)?;
        tracing::info!(cloud = %cloud.name, provider = %cloud.provider, region = %cloud.region, "resolved cloud");
        Ok(Self::new(runner, settings, cloud))
    }

    /// A client for the same cloud driving `controller` and its default model
    /// of the same name.
    #[must_use]
    pub fn with_controller(&self, controller: &str) -> Self
    where
        R: Clone,
    {
        let settings = JujuSettings {
            controller: controller.to_string(),
            model: controller.to_string(),
            ..self.settings.clone()
        };
        Self::new(self.runner.clone(), settings, self.cloud.clone())
    }

    async fn juju(&self, command: &[&str], args: &[&str], timeout: Option<Duration>) -> Result<Output> {
        juju(&self.runner, &self.settings, command, args, timeout).await
    }

    fn model_ref(&self) -> String {
        format!("{}:{}", self.settings.controller, self.settings.model)
    }

    fn controller_model_ref(&self) -> String {
        format!("{}:controller", self.settings.controller)
    }
}

/// Run `juju <command> [--debug] <args>` and fail on a non-zero exit.
async fn juju<R: CommandRunner>(
    runner: &R,
    settings: &JujuSettings,
    command: &[&str],
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<Output> {
    let mut full: Vec<&str> = command.to_vec();
    if settings.debug {
        full.push("--debug");
    }
    full.extend_from_slice(args);

    let what = format!("juju {}", command.join(" "));
    let output = match timeout {
        Some(t) => runner.run_with_timeout(&settings.juju_bin, &full, t).await,
        None => runner.run(&settings.juju_bin, &full).await,
    }
    .with_context(|| what.clone())?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{what} failed ({}): {}", output.status, stderr.trim());
    }
    Ok(output)
}

impl<R: CommandRunner> ModelConfigSource for JujuCli<R> {
    async fn get_model_config(&self) -> Result<ModelConfig> {
        let model = self.model_ref();
        let output = self
            .juju(&["model-config"], &["-m", &model, "--format", "json"], None)
            .await?;
        serde_json::from_slice(&output.stdout).context("parsing juju model-config output")
    }
}

impl<R: CommandRunner> ControllerExec for JujuCli<R> {
    async fn run_on_controller(&self, machine: &str, command: &str) -> Result<Vec<RunResult>> {
        let model = self.controller_model_ref();
        let output = self
            .juju(
                &["run"],
                &["-m", &model, "--format", "json", "--machine", machine, command],
                Some(DEFAULT_EXEC_TIMEOUT),
            )
            .await?;
        serde_json::from_slice(&output.stdout).context("parsing juju run output")
    }
}

impl<R: CommandRunner> CloudRegistryReader for JujuCli<R> {
    fn read_clouds(&self) -> Result<CloudRegistry> {
        read_clouds_file(&self.settings.juju_data.join("clouds.yaml"))
    }
}

/// Parse a `clouds.yaml`; a missing file is an empty registry.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read_clouds_file(path: &Path) -> Result<CloudRegistry> {
    if !path.exists() {
        return Ok(CloudRegistry::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}

impl<R: CommandRunner> CloudEnvironment for JujuCli<R> {
    fn cloud_name(&self) -> &str {
        &self.cloud.name
    }

    fn provider(&self) -> &str {
        &self.cloud.provider
    }

    fn region(&self) -> &str {
        &self.cloud.region
    }
}

impl<R: CommandRunner> CloudRegistrar for JujuCli<R> {
    async fn add_cloud(&self, name: &str, path: &Path) -> Result<()> {
        let file = path.display().to_string();
        self.juju(&["add-cloud"], &["--replace", name, &file], None)
            .await?;
        Ok(())
    }
}

impl<R: CommandRunner> ControllerLifecycle for JujuCli<R> {
    async fn bootstrap(&self, spec: &BootstrapSpec<'_>) -> Result<()> {
        let target = format!("{}/{}", self.cloud.name, self.cloud.region);
        let config: Vec<String> = spec.config.iter().map(|(k, v)| format!("{k}={v}")).collect();

        let mut args = vec![
            target.as_str(),
            self.settings.controller.as_str(),
            "--default-model",
            self.settings.model.as_str(),
        ];
        for kv in &config {
            args.push("--config");
            args.push(kv);
        }
        if let Some(series) = spec.series {
            args.push("--bootstrap-series");
            args.push(series);
        }
        self.juju(&["bootstrap"], &args, Some(LIFECYCLE_TIMEOUT))
            .await?;
        Ok(())
    }

    async fn collect_logs(&self, path: &Path) -> Result<()> {
        let model = self.controller_model_ref();
        let output = self
            .juju(
                &["debug-log"],
                &["-m", &model, "--replay", "--no-tail"],
                Some(DEFAULT_EXEC_TIMEOUT),
            )
            .await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(path, &output.stdout)
            .await
            .with_context(|| format!("writing {}", path.display()))
    }

    async fn destroy(&self) -> Result<()> {
        self.juju(
            &["kill-controller"],
            &[self.settings.controller.as_str(), "-y"],
            Some(LIFECYCLE_TIMEOUT),
        )
        .await?;
        Ok(())
    }
}

impl<R: CommandRunner> ToolMetadataGenerator for JujuCli<R> {
    async fn generate_tools(&self, agent_dir: &Path, agent_stream: &str) -> Result<()> {
        let dir = agent_dir.display().to_string();
        self.juju(
            &["metadata", "generate-tools"],
            &["-d", &dir, "--stream", agent_stream],
            None,
        )
        .await?;
        Ok(())
    }
}
