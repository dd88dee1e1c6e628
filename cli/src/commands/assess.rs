//! `assess-agent-metadata`: stage the agent archive and run the selected scenarios.

use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::scenario::{Teardown, assess_add_cloud, assess_metadata};
use crate::application::services::staging::{StagedAgent, stage_agent_archive};
use crate::domain::{AssessConfig, validate_agent_stream};
use crate::infra::config::check_agent_file;
use crate::output::{OutputContext, progress};

/// Check the configuration before anything talks to juju.
///
/// # Errors
///
/// Returns an error if the agent file is missing or the stream name is invalid.
pub fn validate(config: &AssessConfig) -> Result<()> {
    check_agent_file(&config.agent_file)?;
    validate_agent_stream(&config.agent_stream)?;
    Ok(())
}

/// Run the assessment.
///
/// # Errors
///
/// Returns the first failed check, or any staging, bootstrap, or teardown error.
pub async fn run(app: &AppContext, config: &AssessConfig) -> Result<ExitCode> {
    let ctx = &app.output;
    let reporter = app.reporter();

    ctx.header(&format!("Agent metadata assessment on {}", config.env));
    ctx.kv("agent-file  ", &config.agent_file.display().to_string());
    ctx.kv("agent-stream", &config.agent_stream);
    ctx.kv("controller  ", &config.controller);

    let staged = stage(app, ctx, config).await?;
    let teardown = Teardown {
        logs: config.logs.as_deref(),
        controller: &config.controller,
        keep_env: config.keep_env,
    };

    if config.scenario.includes_metadata() {
        ctx.header("metadata");
        assess_metadata(
            &app.juju,
            &staged,
            config.series.as_deref(),
            &app.hasher,
            &reporter,
            &teardown,
        )
        .await?;
        ctx.success("Successfully deployed and verified agent-metadata-url");
    }

    if config.scenario.includes_add_cloud() {
        ctx.header("add-cloud");
        let controller = config.add_cloud_controller();
        let juju = app.juju.with_controller(&controller);
        let cloud_dir = tempfile::tempdir().context("creating cloud definition dir")?;
        let cloud_file = cloud_dir.path().join("cloud.yaml");
        assess_add_cloud(
            &juju,
            &staged,
            &cloud_file,
            config.series.as_deref(),
            &app.hasher,
            &reporter,
            &Teardown {
                controller: &controller,
                ..teardown
            },
        )
        .await?;
        ctx.success("Successfully deployed and verified add-cloud");
    }

    Ok(ExitCode::SUCCESS)
}

async fn stage(app: &AppContext, ctx: &OutputContext, config: &AssessConfig) -> Result<StagedAgent> {
    let pb = ctx
        .show_progress()
        .then(|| progress::spinner("Staging agent archive and generating tools metadata"));
    let staged = stage_agent_archive(&config.agent_file, &config.agent_stream, &app.juju).await;
    if let Some(pb) = &pb {
        match &staged {
            Ok(s) => progress::finish_ok(pb, &format!("Staged {}", s.archive().display())),
            Err(_) => progress::finish_error(pb, "Staging failed"),
        }
    } else if let Ok(s) = &staged {
        ctx.success(&format!("Staged {}", s.archive().display()));
    }
    staged
}
