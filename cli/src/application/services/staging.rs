//! Stage a local agent archive as a simplestreams tools directory.
//!
//! Layout produced under a temporary `agent_dir`:
//!
//! ```text
//! agent_dir/
//!   tools/
//!     <stream>/juju-2.0.1-xenial-amd64.tgz
//!     streams/v1/...           (written by `juju metadata generate-tools`)
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::application::ports::ToolMetadataGenerator;

/// A staged tools tree. The directory is removed when this is dropped.
pub struct StagedAgent {
    dir: TempDir,
    agent_stream: String,
    archive: PathBuf,
}

impl StagedAgent {
    /// Root of the staged tree.
    #[must_use]
    pub fn agent_dir(&self) -> &Path {
        self.dir.path()
    }

    /// `agent_dir/tools`, the value bootstrapped as `agent-metadata-url`.
    #[must_use]
    pub fn metadata_url(&self) -> String {
        self.dir.path().join("tools").display().to_string()
    }

    #[must_use]
    pub fn agent_stream(&self) -> &str {
        &self.agent_stream
    }

    /// Path of the copied archive.
    #[must_use]
    pub fn archive(&self) -> &Path {
        &self.archive
    }
}

/// Copy `agent_file` into a fresh tools tree and generate its metadata.
///
/// # Errors
///
/// Returns an error if the temp dir cannot be created, the archive cannot be
/// copied, or metadata generation fails.
pub async fn stage_agent_archive(
    agent_file: &Path,
    agent_stream: &str,
    generator: &impl ToolMetadataGenerator,
) -> Result<StagedAgent> {
    let file_name = agent_file
        .file_name()
        .with_context(|| format!("agent file has no file name: {}", agent_file.display()))?;
    let dir = tempfile::Builder::new()
        .prefix("agent-metadata-")
        .tempdir()
        .context("creating agent staging dir")?;
    let stream_dir = dir.path().join("tools").join(agent_stream);
    tokio::fs::create_dir_all(&stream_dir)
        .await
        .with_context(|| format!("creating {}", stream_dir.display()))?;

    let archive = stream_dir.join(file_name);
    tokio::fs::copy(agent_file, &archive)
        .await
        .with_context(|| format!("copying {} to {}", agent_file.display(), archive.display()))?;
    tracing::info!(archive = %archive.display(), "staged agent archive");

    generator
        .generate_tools(dir.path(), agent_stream)
        .await
        .context("generating tools metadata")?;

    Ok(StagedAgent {
        dir,
        agent_stream: agent_stream.to_string(),
        archive,
    })
}
