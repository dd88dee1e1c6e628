//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Assertion errors ──────────────────────────────────────────────────────────

/// An expected value and an actual value disagree, or a required value is
/// missing. Every failed check in this crate surfaces as one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("Cloud '{name}' not found in the cloud registry.")]
    CloudNotFound { name: String },

    #[error("Cloud '{name}' does not match.\nExpected: {expected}\nActual:   {actual}")]
    CloudMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Model config has no 'agent-metadata-url' setting.")]
    MetadataUrlMissing,

    #[error("agent-metadata-url mismatch.\nExpected: {expected}\nActual:   {actual}")]
    MetadataUrlMismatch { expected: String, actual: String },

    #[error("Controller tool record is missing (url={url:?}, sha256={sha256:?}).")]
    ControllerToolMissing {
        url: Option<String>,
        sha256: Option<String>,
    },

    #[error("Local tool record is missing (url={url:?}, sha256={sha256:?}).")]
    LocalToolMissing {
        url: Option<String>,
        sha256: Option<String>,
    },

    #[error("Tool URL mismatch.\nLocal:      {local}\nController: {controller}")]
    UrlMismatch { local: String, controller: String },

    #[error("Tool sha256 mismatch.\nLocal:      {local}\nController: {controller}")]
    Sha256Mismatch { local: String, controller: String },

    #[error("downloaded-tools output has no '{0}' field.")]
    MissingField(&'static str),

    #[error("Cannot derive an archive name from controller URL '{0}'.")]
    InvalidToolUrl(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while validating the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Agent file not found: {0}")]
    AgentFileNotFound(String),

    #[error("Agent file is not a regular file: {0}")]
    AgentFileNotRegular(String),

    #[error("Cannot read agent file {path}: {source}")]
    AgentFileUnreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid agent stream '{0}': must be non-empty and contain no path separators")]
    InvalidAgentStream(String),
}
