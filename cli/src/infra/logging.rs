//! Tracing initialisation for the binary.
//!
//! Diagnostic logs go to stderr; user-facing progress goes through
//! [`crate::output::OutputContext`].

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default verbosity for the given flags. `--debug` wins over `--verbose`.
#[must_use]
pub fn log_level(debug: bool, verbose: bool) -> Level {
    if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG`; falls back to `level`. Only the first call takes effect.
pub fn init_tracing(level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
