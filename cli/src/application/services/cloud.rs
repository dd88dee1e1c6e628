//! Cloud descriptor checks: build the `add-cloud` definition and compare it
//! with what the client's registry stored.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};

use crate::application::ports::{CloudEnvironment, CloudRegistryReader};
use crate::domain::{CloudDescriptor, CloudEntry, check_cloud_entry};

/// Build a descriptor for the client's cloud that points agents at
/// `file://<agent_metadata_url>` on `agent_stream`.
pub fn get_cloud_details(
    client: &impl CloudEnvironment,
    agent_metadata_url: &str,
    agent_stream: &str,
) -> CloudDescriptor {
    CloudDescriptor::new(
        client.cloud_name(),
        client.provider(),
        client.region(),
        agent_metadata_url,
        agent_stream,
    )
}

/// Assert the registry entry for `cloud_name` equals `expected`.
///
/// # Errors
///
/// Returns an error if the registry cannot be read, or an
/// [`AssertionError`](crate::domain::AssertionError) if the entry is missing
/// or differs.
pub fn assert_cloud_details_is_correct(
    client: &impl CloudRegistryReader,
    cloud_name: &str,
    expected: &CloudEntry,
) -> Result<()> {
    let registry = client.read_clouds().context("reading cloud registry")?;
    check_cloud_entry(&registry, cloud_name, expected)?;
    tracing::debug!(cloud = cloud_name, "cloud registry entry matches");
    Ok(())
}
