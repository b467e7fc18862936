use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Boxed error produced by a [`JobServer`](crate::JobServer) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which observer loop noticed the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverStage {
    StatusPoll,
    LogStream,
}

impl fmt::Display for ObserverStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverStage::StatusPoll => f.write_str("polling build status"),
            ObserverStage::LogStream => f.write_str("streaming console output"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(
        "could not connect to job server after {attempts} attempts; \
         make sure the server is running and credentials are valid"
    )]
    Connect {
        attempts: u32,
        #[source]
        source: BoxError,
    },

    #[error("failed to trigger job '{job}'")]
    Trigger {
        job: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to resolve build for queue item {queue_id}")]
    QueueResolution {
        queue_id: i64,
        #[source]
        source: BoxError,
    },

    #[error("failed to poll status of build #{number}")]
    Poll {
        number: i64,
        #[source]
        source: BoxError,
    },

    #[error("failed to fetch console output of build #{number} from offset {offset}")]
    Fetch {
        number: i64,
        offset: i64,
        #[source]
        source: BoxError,
    },

    #[error("timed out after {}s while {stage}", .timeout.as_secs())]
    TimedOut {
        stage: ObserverStage,
        timeout: Duration,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl TriggerError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TriggerError::TimedOut { .. })
    }
}

pub type Result<T> = std::result::Result<T, TriggerError>;
