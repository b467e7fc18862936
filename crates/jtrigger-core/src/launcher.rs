use crate::build::BuildRef;
use crate::params::TriggerRequest;
use crate::server::{JobServer, ServerInfo};
use crate::{Result, TriggerError};

/// Initial attempt plus exactly one retry.
pub const CONNECT_ATTEMPTS: u32 = 2;

/// Outcome of submitting a trigger request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// The server reported queue id 0: the job is already queued or running
    /// elsewhere, nothing new was started.
    AlreadyRunning,
    Started(BuildRef),
}

/// Connect to the job server, retrying once on failure.
///
/// Trigger, poll and fetch calls are never retried; this is the only retry in
/// the whole protocol.
pub async fn connect_with_retry<S: JobServer>(server: &S) -> Result<ServerInfo> {
    match server.connect().await {
        Ok(info) => Ok(info),
        Err(first) => {
            tracing::warn!(error = %first, "initial connection attempt failed, retrying");
            server
                .connect()
                .await
                .map_err(|e| TriggerError::Connect {
                    attempts: CONNECT_ATTEMPTS,
                    source: Box::new(e),
                })
        }
    }
}

/// Submit `request` and resolve the resulting queue entry into a build.
pub async fn launch<S: JobServer>(server: &S, request: &TriggerRequest) -> Result<Launch> {
    tracing::info!(job = %request.job_name, params = request.params.len(), "triggering job");
    let queue_id = server
        .trigger(request)
        .await
        .map_err(|e| TriggerError::Trigger {
            job: request.job_name.clone(),
            source: Box::new(e),
        })?;

    if queue_id == 0 {
        tracing::info!(job = %request.job_name, "job is already running; not observing");
        return Ok(Launch::AlreadyRunning);
    }

    tracing::debug!(queue_id, "waiting for queue entry to start");
    let build = server
        .resolve_build_from_queue(&request.job_name, queue_id)
        .await
        .map_err(|e| TriggerError::QueueResolution {
            queue_id,
            source: Box::new(e),
        })?;
    tracing::info!(number = build.number, queue_id, "build started");
    Ok(Launch::Started(build))
}
