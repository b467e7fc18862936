use reqwest::Method;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JenkinsError {
    #[error("invalid server url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: Method,
        url: String,
        status: u16,
    },

    #[error("trigger response for job '{job}' has no Location header")]
    MissingLocation { job: String },

    #[error("cannot read queue id from Location '{0}'")]
    InvalidQueueLocation(String),

    #[error("queue item {queue_id} was cancelled")]
    QueueCancelled { queue_id: i64 },

    #[error("failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl JenkinsError {
    /// HTTP status code, when the server answered with a non-success status.
    pub fn status(&self) -> Option<u16> {
        match self {
            JenkinsError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
