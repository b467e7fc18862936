use serde::{Deserialize, Serialize};
use std::fmt;

// ─── BuildRef ─────────────────────────────────────────────────────────────

/// Identity of one build instance on the job server.
///
/// Immutable once resolved from the queue; both observer loops hold a shared
/// reference to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRef {
    pub job_name: String,
    pub number: i64,
    pub queue_id: i64,
}

// ─── BuildResult ──────────────────────────────────────────────────────────

/// Result string reported by the server once a build has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildResult {
    Success,
    Failure,
    Aborted,
    /// Any other value (`UNSTABLE`, `NOT_BUILT`, …), kept verbatim.
    Other(String),
}

impl BuildResult {
    pub fn as_str(&self) -> &str {
        match self {
            BuildResult::Success => "SUCCESS",
            BuildResult::Failure => "FAILURE",
            BuildResult::Aborted => "ABORTED",
            BuildResult::Other(s) => s,
        }
    }

    /// `SUCCESS`, `FAILURE` and `ABORTED` end a build unconditionally.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BuildResult::Other(_))
    }
}

impl From<String> for BuildResult {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SUCCESS" => BuildResult::Success,
            "FAILURE" => BuildResult::Failure,
            "ABORTED" => BuildResult::Aborted,
            _ => BuildResult::Other(s),
        }
    }
}

impl From<&str> for BuildResult {
    fn from(s: &str) -> Self {
        BuildResult::from(s.to_string())
    }
}

impl From<BuildResult> for String {
    fn from(r: BuildResult) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── BuildState ───────────────────────────────────────────────────────────

/// Polled state of a build. Written only by the status poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildState {
    pub number: i64,
    /// `None` until the server reports a result.
    pub result: Option<BuildResult>,
    pub building: bool,
}

impl BuildState {
    /// State of a build that has not been polled yet.
    pub fn pending(number: i64) -> Self {
        Self {
            number,
            result: None,
            building: true,
        }
    }

    /// True once no further status change can happen.
    ///
    /// A non-standard result (`UNSTABLE`, `NOT_BUILT`) only counts once the
    /// server also says the build is no longer running.
    pub fn is_terminal(&self) -> bool {
        match &self.result {
            None => false,
            Some(r) if r.is_terminal() => true,
            Some(BuildResult::Other(s)) => !s.is_empty() && !self.building,
            Some(_) => false,
        }
    }
}

// ─── ConsoleChunk ─────────────────────────────────────────────────────────

/// One response of the incremental console endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsoleChunk {
    pub content: String,
    /// Offset to request next.
    pub next_offset: i64,
    /// Server-side flag: more text may follow.
    pub has_more: bool,
}
