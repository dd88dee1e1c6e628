//! Scenario flow: bootstrap, checks, log collection, teardown.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use tempfile::TempDir;

use agent_metadata::application::services::scenario::{
    Teardown, assess_add_cloud, assess_metadata,
};
use agent_metadata::application::services::staging::{StagedAgent, stage_agent_archive};
use agent_metadata::domain::AssertionError;
use agent_metadata::domain::tools::file_url;

use crate::helpers::{
    ARCHIVE, FakeJuju, FixedHasher, NoopGenerator, RecordingReporter, SAMPLE_SHA256,
    downloaded_tools, model_config,
};

const CONTROLLER: &str = "assess-ctrl";

struct Fixture {
    _src: TempDir,
    staged: StagedAgent,
}

async fn staged_agent() -> Fixture {
    let src = tempfile::tempdir().expect("tempdir");
    let agent_file = src.path().join(ARCHIVE);
    std::fs::write(&agent_file, b"agent bytes").expect("write archive");
    let staged = stage_agent_archive(&agent_file, "testing", &NoopGenerator)
        .await
        .expect("stage");
    Fixture { _src: src, staged }
}

/// A client whose controller and model agree with `staged`.
fn healthy_client(staged: &StagedAgent) -> FakeJuju {
    FakeJuju {
        model_config: model_config(&staged.metadata_url()),
        ..FakeJuju::with_controller_output(&downloaded_tools(
            &file_url(staged.archive()),
            SAMPLE_SHA256,
        ))
    }
}

fn teardown(logs: Option<&Path>, keep_env: bool) -> Teardown<'_> {
    Teardown {
        logs,
        controller: CONTROLLER,
        keep_env,
    }
}

fn is_run(call: &str) -> bool {
    call.starts_with("run 0 ")
}

// ── assess_metadata ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_assess_metadata_passes_and_destroys() {
    let fx = staged_agent().await;
    let client = healthy_client(&fx.staged);
    let reporter = RecordingReporter::default();

    assess_metadata(
        &client,
        &fx.staged,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &reporter,
        &teardown(None, false),
    )
    .await
    .expect("scenario passes");

    let calls = client.calls();
    assert_eq!(calls[0], "bootstrap");
    assert_eq!(calls[1], "model-config");
    assert!(is_run(&calls[2]));
    assert_eq!(calls[3], "kill-controller");
    assert_eq!(calls.len(), 4);
    assert!(reporter.warnings().is_empty());
}

#[tokio::test]
async fn test_assess_metadata_bootstraps_with_metadata_url_and_stream() {
    let fx = staged_agent().await;
    let client = healthy_client(&fx.staged);

    assess_metadata(
        &client,
        &fx.staged,
        Some("xenial"),
        &FixedHasher::new(SAMPLE_SHA256),
        &RecordingReporter::default(),
        &teardown(None, false),
    )
    .await
    .expect("scenario passes");

    assert_eq!(
        client.bootstrap_config.borrow().as_slice(),
        [
            ("agent-metadata-url".to_string(), fx.staged.metadata_url()),
            ("agent-stream".to_string(), "testing".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_assess_metadata_failed_check_still_tears_down() {
    let fx = staged_agent().await;
    let client = FakeJuju {
        model_config: model_config("INVALID"),
        ..healthy_client(&fx.staged)
    };

    let err = assess_metadata(
        &client,
        &fx.staged,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &RecordingReporter::default(),
        &teardown(None, false),
    )
    .await
    .expect_err("metadata mismatch");

    assert!(matches!(
        err.downcast_ref::<AssertionError>(),
        Some(AssertionError::MetadataUrlMismatch { .. })
    ));
    let calls = client.calls();
    assert!(!calls.iter().any(|c| is_run(c)), "tool check must not run");
    assert_eq!(calls.last().map(String::as_str), Some("kill-controller"));
}

#[tokio::test]
async fn test_assess_metadata_failed_bootstrap_still_tears_down() {
    let fx = staged_agent().await;
    let client = FakeJuju {
        bootstrap_fails: true,
        ..healthy_client(&fx.staged)
    };

    let err = assess_metadata(
        &client,
        &fx.staged,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &RecordingReporter::default(),
        &teardown(None, false),
    )
    .await
    .expect_err("bootstrap fails");

    assert!(format!("{err:#}").contains("failed to bootstrap"));
    assert_eq!(client.calls(), ["bootstrap", "kill-controller"]);
}

#[tokio::test]
async fn test_assess_metadata_check_error_wins_over_teardown_error() {
    let fx = staged_agent().await;
    let client = FakeJuju {
        model_config: model_config("INVALID"),
        destroy_fails: true,
        ..healthy_client(&fx.staged)
    };
    let reporter = RecordingReporter::default();

    let err = assess_metadata(
        &client,
        &fx.staged,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &reporter,
        &teardown(None, false),
    )
    .await
    .expect_err("check fails");

    assert!(err.downcast_ref::<AssertionError>().is_some());
    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("controller not found"));
}

#[tokio::test]
async fn test_assess_metadata_teardown_error_reported_when_checks_pass() {
    let fx = staged_agent().await;
    let client = FakeJuju {
        destroy_fails: true,
        ..healthy_client(&fx.staged)
    };

    let err = assess_metadata(
        &client,
        &fx.staged,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &RecordingReporter::default(),
        &teardown(None, false),
    )
    .await
    .expect_err("destroy fails");

    assert!(format!("{err:#}").contains("destroying controller"));
}

#[tokio::test]
async fn test_assess_metadata_keep_env_skips_destroy() {
    let fx = staged_agent().await;
    let client = healthy_client(&fx.staged);
    let reporter = RecordingReporter::default();

    assess_metadata(
        &client,
        &fx.staged,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &reporter,
        &teardown(None, true),
    )
    .await
    .expect("scenario passes");

    assert!(!client.calls().iter().any(|c| c == "kill-controller"));
    assert!(reporter.warnings()[0].contains(CONTROLLER));
}

#[tokio::test]
async fn test_assess_metadata_collects_logs_before_destroy() {
    let fx = staged_agent().await;
    let logs = tempfile::tempdir().expect("logs dir");
    let client = healthy_client(&fx.staged);

    assess_metadata(
        &client,
        &fx.staged,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &RecordingReporter::default(),
        &teardown(Some(logs.path()), false),
    )
    .await
    .expect("scenario passes");

    assert_eq!(
        client.logs_written.borrow().as_slice(),
        [logs.path().join("assess-ctrl-debug.log")]
    );
    let calls = client.calls();
    assert_eq!(&calls[calls.len() - 2..], ["debug-log", "kill-controller"]);
}

#[tokio::test]
async fn test_assess_metadata_log_failure_only_warns() {
    let fx = staged_agent().await;
    let logs = tempfile::tempdir().expect("logs dir");
    let client = FakeJuju {
        logs_fail: true,
        ..healthy_client(&fx.staged)
    };
    let reporter = RecordingReporter::default();

    assess_metadata(
        &client,
        &fx.staged,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &reporter,
        &teardown(Some(logs.path()), false),
    )
    .await
    .expect("log collection failure is not fatal");

    assert!(reporter.warnings()[0].contains("could not collect logs"));
    assert_eq!(client.calls().last().map(String::as_str), Some("kill-controller"));
}

// ── assess_add_cloud ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_assess_add_cloud_registers_and_verifies() {
    let fx = staged_agent().await;
    let work = tempfile::tempdir().expect("work dir");
    let cloud_file = work.path().join("cloud.yaml");
    let client = healthy_client(&fx.staged);

    assess_add_cloud(
        &client,
        &fx.staged,
        &cloud_file,
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &RecordingReporter::default(),
        &teardown(None, false),
    )
    .await
    .expect("scenario passes");

    let calls = client.calls();
    assert_eq!(calls[0], "add-cloud testcloud");
    assert_eq!(calls[1], "bootstrap");
    assert!(is_run(&calls[2]));
    assert_eq!(calls[3], "kill-controller");
    assert!(client.bootstrap_config.borrow().is_empty());

    let entry = client.registry.borrow().get("testcloud").cloned().expect("registered");
    assert_eq!(
        entry.config.agent_metadata_url,
        Some(format!("file://{}", fx.staged.metadata_url()))
    );
    let written = std::fs::read_to_string(&cloud_file).expect("cloud file");
    assert!(written.contains("agent-metadata-url"));
}

#[tokio::test]
async fn test_assess_add_cloud_registry_mismatch_skips_bootstrap() {
    let fx = staged_agent().await;
    let work = tempfile::tempdir().expect("work dir");
    let client = FakeJuju {
        corrupt_added_cloud: true,
        ..healthy_client(&fx.staged)
    };

    let err = assess_add_cloud(
        &client,
        &fx.staged,
        &work.path().join("cloud.yaml"),
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &RecordingReporter::default(),
        &teardown(None, false),
    )
    .await
    .expect_err("registry differs");

    assert!(matches!(
        err.downcast_ref::<AssertionError>(),
        Some(AssertionError::CloudMismatch { .. })
    ));
    assert_eq!(client.calls(), ["add-cloud testcloud"]);
}

#[tokio::test]
async fn test_assess_add_cloud_tool_mismatch_tears_down() {
    let fx = staged_agent().await;
    let work = tempfile::tempdir().expect("work dir");
    let client = FakeJuju::with_controller_output(&downloaded_tools(
        &file_url(fx.staged.archive()),
        "INVALID_SHA256",
    ));

    let err = assess_add_cloud(
        &client,
        &fx.staged,
        &work.path().join("cloud.yaml"),
        None,
        &FixedHasher::new(SAMPLE_SHA256),
        &RecordingReporter::default(),
        &teardown(None, false),
    )
    .await
    .expect_err("sha mismatch");

    assert!(matches!(
        err.downcast_ref::<AssertionError>(),
        Some(AssertionError::Sha256Mismatch { .. })
    ));
    assert_eq!(client.calls().last().map(String::as_str), Some("kill-controller"));
}
