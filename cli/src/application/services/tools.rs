//! Tool verification: compare the agent archive the controller downloaded
//! with the one staged locally.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{ControllerExec, FileHasher, ModelConfigSource};
use crate::domain::tools::{
    CONTROLLER_MACHINE, DOWNLOADED_TOOLS_CMD, archive_name, file_url, local_tool_path,
};
use crate::domain::{
    AssertionError, DownloadedTools, ToolRecord, check_agent_metadata_url, check_deployed_tool,
};

/// Derive the local record for the archive named by `controller_url`.
///
/// Returns [`ToolRecord::missing`] when the archive is not present under
/// `agent_dir/tools/<agent_stream>/`.
///
/// # Errors
///
/// Returns an error if the URL has no archive name or the file exists but
/// cannot be hashed.
pub fn get_local_url_and_sha256(
    agent_dir: &Path,
    controller_url: &str,
    agent_stream: &str,
    hasher: &impl FileHasher,
) -> Result<ToolRecord> {
    let archive = archive_name(controller_url)?;
    let path = local_tool_path(agent_dir, agent_stream, archive);
    let Some(sha256) = hasher.sha256_file(&path)? else {
        tracing::warn!(path = %path.display(), "local agent archive not found");
        return Ok(ToolRecord::missing());
    };
    Ok(ToolRecord::new(file_url(&path), sha256))
}

/// Read the tool record the controller's machine 0 downloaded.
///
/// # Errors
///
/// - Returns an error if the remote command fails or returns no output.
/// - Returns an error if the output is not a JSON object.
/// - Returns [`AssertionError::MissingField`] if `url` or `sha256` is absent.
pub async fn get_controller_url_and_sha256(client: &impl ControllerExec) -> Result<ToolRecord> {
    let results = client
        .run_on_controller(CONTROLLER_MACHINE, DOWNLOADED_TOOLS_CMD)
        .await
        .context("reading downloaded tools from controller")?;
    let Some(first) = results.first() else {
        anyhow::bail!("controller returned no output for: {DOWNLOADED_TOOLS_CMD}");
    };
    if first.return_code != 0 {
        anyhow::bail!(
            "{DOWNLOADED_TOOLS_CMD} failed on machine {} (exit {}): {}",
            first.machine_id,
            first.return_code,
            first.stderr.trim()
        );
    }
    let downloaded: DownloadedTools = serde_json::from_str(first.stdout.trim())
        .with_context(|| format!("parsing downloaded tools: {}", first.stdout.trim()))?;
    tracing::debug!(version = ?downloaded.version, size = ?downloaded.size, "controller tools");
    Ok(downloaded.into_record()?)
}

/// Verify that the controller deployed the locally staged archive.
///
/// # Errors
///
/// Returns an [`AssertionError`] if either record is missing, the URLs
/// differ, or the checksums differ. Transport errors propagate unchanged.
pub async fn verify_deployed_tool(
    agent_dir: &Path,
    client: &impl ControllerExec,
    agent_stream: &str,
    hasher: &impl FileHasher,
) -> Result<()> {
    let controller = get_controller_url_and_sha256(client).await?;
    let Some(controller_url) = controller.url.as_deref().filter(|u| !u.is_empty()) else {
        return Err(AssertionError::ControllerToolMissing {
            url: controller.url.clone(),
            sha256: controller.sha256.clone(),
        }
        .into());
    };
    let local = get_local_url_and_sha256(agent_dir, controller_url, agent_stream, hasher)?;
    check_deployed_tool(&local, &controller)?;
    tracing::info!(url = controller_url, "deployed tool verified");
    Ok(())
}

/// Assert the model's `agent-metadata-url` is exactly `agent_file`.
///
/// # Errors
///
/// Returns an error if model config cannot be read, or an
/// [`AssertionError`] if the setting is absent or differs.
pub async fn assert_metadata_is_correct(
    agent_file: &str,
    client: &impl ModelConfigSource,
) -> Result<()> {
    let config = client
        .get_model_config()
        .await
        .context("reading model config")?;
    check_agent_metadata_url(&config, agent_file)?;
    Ok(())
}
