//! Unit tests for assess-agent-metadata
//!
//! These tests use in-memory port doubles and run fast without a juju binary.

mod helpers;
mod scenario;
