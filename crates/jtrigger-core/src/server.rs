use crate::build::{BuildRef, BuildState, ConsoleChunk};
use crate::params::TriggerRequest;

/// What the server told us while connecting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub version: Option<String>,
}

/// The remote job-server capability the protocol runs against.
///
/// Every method is a single remote call (or, for queue resolution, a wait on
/// the server's queue); none of them retries. Retry policy lives in the
/// launcher.
#[allow(async_fn_in_trait)]
pub trait JobServer {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Verify the server is reachable and the credentials are accepted.
    async fn connect(&self) -> Result<ServerInfo, Self::Error>;

    /// Submit a build request. Returns the queue id; `0` means the job was
    /// already queued or running and nothing new was submitted.
    async fn trigger(&self, request: &TriggerRequest) -> Result<i64, Self::Error>;

    /// Wait for a queue entry to turn into a concrete build.
    async fn resolve_build_from_queue(
        &self,
        job_name: &str,
        queue_id: i64,
    ) -> Result<BuildRef, Self::Error>;

    /// Fetch the current state of a build.
    async fn poll_status(&self, build: &BuildRef, depth: u32) -> Result<BuildState, Self::Error>;

    /// Fetch console text starting at `offset`.
    async fn fetch_console(&self, build: &BuildRef, offset: i64)
        -> Result<ConsoleChunk, Self::Error>;
}
