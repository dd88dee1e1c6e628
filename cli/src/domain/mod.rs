//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod cloud;
pub mod config;
pub mod error;
pub mod model;
pub mod tools;

pub use cloud::{CloudConfig, CloudDescriptor, CloudEntry, CloudRegistry, check_cloud_entry};
pub use config::{AssessConfig, DEFAULT_AGENT_STREAM, Scenario, validate_agent_stream};
pub use error::{AssertionError, ConfigError};
pub use model::{ModelConfig, check_agent_metadata_url};
pub use tools::{DownloadedTools, RunResult, ToolRecord, check_deployed_tool};
