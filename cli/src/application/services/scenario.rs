//! End-to-end scenarios: bootstrap, check, tear down.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{
    BootstrapSpec, CloudRegistrar, ControllerLifecycle, FileHasher, JujuClient, ProgressReporter,
};
use crate::application::services::cloud::{assert_cloud_details_is_correct, get_cloud_details};
use crate::application::services::staging::StagedAgent;
use crate::application::services::tools::{assert_metadata_is_correct, verify_deployed_tool};

/// Teardown options shared by all scenarios.
pub struct Teardown<'a> {
    /// Directory to write the controller debug log into.
    pub logs: Option<&'a Path>,
    /// Controller name, used for the log file name.
    pub controller: &'a str,
    /// Skip destroying the controller.
    pub keep_env: bool,
}

/// Bootstrap with `agent-metadata-url` pointing at the staged tools, then
/// check model config and the deployed tool.
///
/// # Errors
///
/// Returns the first failed check or bootstrap error. Teardown runs after a
/// failed bootstrap too; its errors are returned only when every check passed.
pub async fn assess_metadata<C>(
    client: &C,
    staged: &StagedAgent,
    series: Option<&str>,
    hasher: &impl FileHasher,
    reporter: &impl ProgressReporter,
    teardown: &Teardown<'_>,
) -> Result<()>
where
    C: JujuClient + ControllerLifecycle,
{
    let metadata_url = staged.metadata_url();
    let stream = staged.agent_stream();
    let config = [("agent-metadata-url", metadata_url.as_str()), ("agent-stream", stream)];

    reporter.step(&format!("Bootstrapping with agent-metadata-url={metadata_url}"));
    let outcome = async {
        client
            .bootstrap(&BootstrapSpec {
                config: &config,
                series,
            })
            .await
            .context("bootstrap with agent-metadata-url")?;
        assert_metadata_is_correct(&metadata_url, client).await?;
        reporter.success("Model agent-metadata-url matches");
        verify_deployed_tool(staged.agent_dir(), client, stream, hasher).await?;
        reporter.success("Deployed tool matches the staged archive");
        Ok::<(), anyhow::Error>(())
    }
    .await;

    finish(client, reporter, teardown, outcome).await
}

/// Register the env's cloud with `agent-metadata-url` in its config, check
/// the registry, then bootstrap and check the deployed tool.
///
/// `cloud_file` is where the cloud definition YAML is written.
///
/// # Errors
///
/// Returns the first failed check or bootstrap error. Teardown runs after a
/// failed bootstrap too; its errors are returned only when every check passed.
pub async fn assess_add_cloud<C>(
    client: &C,
    staged: &StagedAgent,
    cloud_file: &Path,
    series: Option<&str>,
    hasher: &impl FileHasher,
    reporter: &impl ProgressReporter,
    teardown: &Teardown<'_>,
) -> Result<()>
where
    C: JujuClient + ControllerLifecycle + CloudRegistrar,
{
    let metadata_url = staged.metadata_url();
    let stream = staged.agent_stream();
    let descriptor = get_cloud_details(client, &metadata_url, stream);

    let yaml = serde_yaml::to_string(&descriptor.to_registry())
        .context("serializing cloud definition")?;
    tokio::fs::write(cloud_file, yaml)
        .await
        .with_context(|| format!("writing {}", cloud_file.display()))?;

    reporter.step(&format!("Adding cloud {}", descriptor.name));
    client.add_cloud(&descriptor.name, cloud_file).await?;
    assert_cloud_details_is_correct(client, &descriptor.name, &descriptor.entry)?;
    reporter.success(&format!("Cloud {} registered with agent metadata", descriptor.name));

    reporter.step(&format!("Bootstrapping {}", descriptor.name));
    let outcome = async {
        client
            .bootstrap(&BootstrapSpec {
                config: &[],
                series,
            })
            .await
            .context("bootstrap on added cloud")?;
        verify_deployed_tool(staged.agent_dir(), client, stream, hasher).await?;
        reporter.success("Deployed tool matches the staged archive");
        Ok::<(), anyhow::Error>(())
    }
    .await;

    finish(client, reporter, teardown, outcome).await
}

/// Collect logs and destroy the controller, keeping `outcome` as the result
/// when it already failed.
async fn finish(
    client: &impl ControllerLifecycle,
    reporter: &impl ProgressReporter,
    teardown: &Teardown<'_>,
    outcome: Result<()>,
) -> Result<()> {
    if let Some(dir) = teardown.logs {
        let path = dir.join(format!("{}-debug.log", teardown.controller));
        if let Err(e) = client.collect_logs(&path).await {
            reporter.warn(&format!("could not collect logs: {e:#}"));
        }
    }

    let destroyed = if teardown.keep_env {
        reporter.warn(&format!("Leaving controller {} running", teardown.controller));
        Ok(())
    } else {
        client.destroy().await.context("destroying controller")
    };

    match (outcome, destroyed) {
        (Err(check), Err(e)) => {
            reporter.warn(&format!("teardown failed: {e:#}"));
            Err(check)
        }
        (Err(check), Ok(())) => Err(check),
        (Ok(()), destroyed) => destroyed,
    }
}
