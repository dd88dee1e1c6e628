//! assess-agent-metadata - verify agent tools metadata against a Juju controller

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;

use agent_metadata::cli::Cli;
use agent_metadata::output::OutputContext;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = OutputContext::new(cli.no_color, cli.quiet);
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            output.error(&format!("Error: {e:#}"));
            ExitCode::FAILURE
        }
    }
}
