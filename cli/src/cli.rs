//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::app::AppContext;
use crate::commands;
use crate::domain::{AssessConfig, DEFAULT_AGENT_STREAM, Scenario};

/// Verify agent tools metadata against a bootstrapped controller
#[derive(Parser, Debug)]
#[command(name = "assess-agent-metadata", version)]
pub struct Cli {
    /// Cloud (environment) to bootstrap against
    pub env: String,

    /// Path to the juju binary
    #[arg(default_value = "juju")]
    pub juju_bin: String,

    /// Directory to store controller logs in
    pub logs: Option<PathBuf>,

    /// Controller and model name to use (defaults to env)
    pub temp_env_name: Option<String>,

    /// Local agent archive to stage and verify
    #[arg(long, required = true)]
    pub agent_file: PathBuf,

    /// Agent stream the archive is published on
    #[arg(long, default_value = DEFAULT_AGENT_STREAM)]
    pub agent_stream: String,

    /// Region to bootstrap in (defaults to the cloud's first region)
    #[arg(long)]
    pub region: Option<String>,

    /// Series for the bootstrap machine
    #[arg(long)]
    pub series: Option<String>,

    /// Leave controllers running after the checks
    #[arg(long)]
    pub keep_env: bool,

    /// Which checks to run
    #[arg(long, value_enum, default_value_t = ScenarioArg::All)]
    pub scenario: ScenarioArg,

    /// Debug logging, also passed to juju
    #[arg(long)]
    pub debug: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,
}

/// `--scenario` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioArg {
    Metadata,
    AddCloud,
    All,
}

impl From<ScenarioArg> for Scenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Metadata => Scenario::Metadata,
            ScenarioArg::AddCloud => Scenario::AddCloud,
            ScenarioArg::All => Scenario::All,
        }
    }
}

impl Cli {
    /// Convert parsed arguments into the run configuration.
    #[must_use]
    pub fn to_config(&self) -> AssessConfig {
        AssessConfig {
            env: self.env.clone(),
            juju_bin: self.juju_bin.clone(),
            logs: self.logs.clone(),
            controller: self
                .temp_env_name
                .clone()
                .unwrap_or_else(|| self.env.clone()),
            agent_file: self.agent_file.clone(),
            agent_stream: self.agent_stream.clone(),
            region: self.region.clone(),
            series: self.series.clone(),
            keep_env: self.keep_env,
            scenario: self.scenario.into(),
            debug: self.debug,
        }
    }

    /// Execute the assessment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or any check fails.
    pub async fn run(self) -> Result<ExitCode> {
        crate::infra::logging::init_tracing(crate::infra::logging::log_level(
            self.debug,
            self.verbose,
        ));
        let config = self.to_config();
        commands::assess::validate(&config)?;
        let app = AppContext::new(&config, self.no_color, self.quiet).await?;
        commands::assess::run(&app, &config).await
    }
}
