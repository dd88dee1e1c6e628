//! Application context: unified state passed to the command handler.

use anyhow::Result;

use crate::domain::AssessConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::juju_data_dir;
use crate::infra::fs::LocalFs;
use crate::infra::juju::{JujuCli, JujuSettings};
use crate::output::{OutputContext, TerminalReporter};

/// Unified application context.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to the
/// command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Juju client bound to the configured cloud and controller.
    pub juju: JujuCli<TokioCommandRunner>,
    /// Local archive hasher.
    pub hasher: LocalFs,
}

impl AppContext {
    /// Construct an `AppContext`, resolving the target cloud with `juju show-cloud`.
    ///
    /// # Errors
    ///
    /// Returns an error if the juju data directory cannot be determined or
    /// the cloud cannot be resolved.
    pub async fn new(config: &AssessConfig, no_color: bool, quiet: bool) -> Result<Self> {
        let settings = JujuSettings {
            juju_bin: config.juju_bin.clone(),
            controller: config.controller.clone(),
            model: config.model().to_string(),
            juju_data: juju_data_dir()?,
            debug: config.debug,
        };
        let juju = JujuCli::discover(
            TokioCommandRunner::default(),
            settings,
            &config.env,
            config.region.as_deref(),
        )
        .await?;

        Ok(Self {
            output: OutputContext::new(no_color, quiet),
            juju,
            hasher: LocalFs,
        })
    }

    /// Progress reporter writing to this context's terminal.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }
}
