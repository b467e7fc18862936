mod args;

use anyhow::Context;
use args::Cli;
use clap::Parser;
use jenkins_client::{Credentials, JenkinsClient, JenkinsError};
use jtrigger_core::{FinalStatus, PluginConfig, RunOutcome, TriggerError};

// ---------------------------------------------------------------------------
// RunExit: typed non-zero exit codes
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum RunExit {
    InvalidConfig(String),
    Unsuccessful(FinalStatus),
}

impl RunExit {
    fn exit_code(&self) -> i32 {
        match self {
            RunExit::InvalidConfig(_) => 2,
            RunExit::Unsuccessful(_) => 1,
        }
    }
}

impl std::fmt::Display for RunExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunExit::InvalidConfig(reason) => write!(f, "invalid server url: {reason}"),
            RunExit::Unsuccessful(status) => {
                write!(f, "build finished with status {status}")
            }
        }
    }
}

impl std::error::Error for RunExit {}

fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(exit) = err.downcast_ref::<RunExit>() {
        return exit.exit_code();
    }
    match err.downcast_ref::<TriggerError>() {
        Some(TriggerError::Config(_)) => 2,
        _ => 1,
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

fn execute(config: &PluginConfig) -> anyhow::Result<RunOutcome> {
    config.validate()?;

    let credentials = Credentials::from_parts(&config.username, &config.password);
    let client = JenkinsClient::new(&config.url, credentials).map_err(|e| -> anyhow::Error {
        match e {
            JenkinsError::InvalidUrl { reason, .. } => RunExit::InvalidConfig(reason).into(),
            other => other.into(),
        }
    })?;

    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let stdout = std::io::stdout();
    let outcome = rt.block_on(jtrigger_core::run(&client, config, &mut stdout.lock()))?;

    if config.fail_on_unsuccessful {
        if let Some(status) = outcome.status().filter(|s| !s.is_success()) {
            return Err(RunExit::Unsuccessful(status.clone()).into());
        }
    }
    Ok(outcome)
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(cli.log_level().into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.into_config();
    tracing::debug!(?config, "configuration loaded");

    if let Err(e) = execute(&config) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}
