use std::io::Write;

use crate::build::BuildRef;
use crate::launcher::{self, Launch};
use crate::observer::{self, Deadline};
use crate::params::TriggerRequest;
use crate::report::{self, FinalStatus};
use crate::server::JobServer;
use crate::{PluginConfig, Result};

/// How a run ended, when it did not end in a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The job was already running; nothing was observed.
    AlreadyRunning,
    Completed { build: BuildRef, status: FinalStatus },
}

impl RunOutcome {
    pub fn status(&self) -> Option<&FinalStatus> {
        match self {
            RunOutcome::AlreadyRunning => None,
            RunOutcome::Completed { status, .. } => Some(status),
        }
    }
}

/// Trigger the configured job and follow it to completion.
///
/// Progress lines, console text and the final status line are written to
/// `out`. Any fatal condition is returned as an error; nothing is retried
/// except the initial connection.
pub async fn run<S: JobServer, W: Write>(
    server: &S,
    config: &PluginConfig,
    out: &mut W,
) -> Result<RunOutcome> {
    config.validate()?;
    let request = TriggerRequest::from_config(config);

    writeln!(out, "Step 1: Connecting to job server {}", config.url)?;
    let info = launcher::connect_with_retry(server).await?;
    tracing::info!(version = info.version.as_deref().unwrap_or("unknown"), "connected");
    writeln!(out, "Connected to job server")?;

    writeln!(out, "Step 2: Triggering job: {}", request.job_name)?;
    let build = match launcher::launch(server, &request).await? {
        Launch::AlreadyRunning => {
            writeln!(out, "Exiting as job is already running")?;
            return Ok(RunOutcome::AlreadyRunning);
        }
        Launch::Started(build) => build,
    };
    writeln!(out, "Job build no - {}", build.number)?;

    let deadline = Deadline::after(config.timeout);
    let observation =
        observer::observe(server, &build, config.poll_interval, deadline, out).await?;

    let status = report::report(&observation.state, out)?;
    Ok(RunOutcome::Completed { build, status })
}
