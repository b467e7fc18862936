//! The two observer loops and the deadline they share.
//!
//! The status poller owns the [`BuildState`]; the console streamer only sees
//! the immutable [`BuildRef`] and its own [`ConsoleCursor`]. Both run inside
//! one `try_join!`, so the caller gets the final state back only after both
//! loops have finished, and a fatal error in either drops the other.

use std::io::Write;
use std::time::Duration;

use tokio::time::Instant;

use crate::build::{BuildRef, BuildState};
use crate::server::JobServer;
use crate::{ObserverStage, Result, TriggerError};

/// `depth` passed on every status poll.
pub const STATUS_DEPTH: u32 = 1;

// ─── Deadline ─────────────────────────────────────────────────────────────

/// Single cancellation point for both loops, anchored when it is created.
/// Never reset or extended.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Instant,
    timeout: Duration,
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        // Far enough away to never fire for absurd timeouts.
        let expires_at = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + Duration::from_secs(100 * 365 * 24 * 60 * 60));
        Self {
            expires_at,
            timeout,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn check(&self, stage: ObserverStage) -> Result<()> {
        if self.is_expired() {
            tracing::warn!(%stage, timeout_secs = self.timeout.as_secs(), "plugin timeout occurred");
            return Err(TriggerError::TimedOut {
                stage,
                timeout: self.timeout,
            });
        }
        Ok(())
    }
}

// ─── ConsoleCursor ────────────────────────────────────────────────────────

/// Position in the build's console text. Only moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleCursor {
    offset: i64,
}

impl ConsoleCursor {
    pub fn offset(&self) -> i64 {
        self.offset
    }

    fn advance_to(&mut self, next: i64) {
        self.offset = self.offset.max(next);
    }
}

// ─── Status poller ────────────────────────────────────────────────────────

/// Poll until the build reaches a terminal result.
///
/// Each iteration checks the deadline, then sleeps the full `poll_interval`,
/// then polls once. The sleep happens before the poll on every iteration,
/// including the first, so a timeout may be noticed up to one interval late.
/// A failed poll ends the loop.
pub async fn poll_until_terminal<S: JobServer>(
    server: &S,
    build: &BuildRef,
    poll_interval: Duration,
    deadline: &Deadline,
) -> Result<BuildState> {
    let mut state = BuildState::pending(build.number);
    while !state.is_terminal() {
        deadline.check(ObserverStage::StatusPoll)?;
        tokio::time::sleep(poll_interval).await;
        state = server
            .poll_status(build, STATUS_DEPTH)
            .await
            .map_err(|e| TriggerError::Poll {
                number: build.number,
                source: Box::new(e),
            })?;
        tracing::debug!(
            number = state.number,
            result = state.result.as_ref().map(|r| r.as_str()).unwrap_or(""),
            building = state.building,
            "polled build status"
        );
    }
    Ok(state)
}

// ─── Console streamer ─────────────────────────────────────────────────────

/// Copy console text to `out` until the server says there is no more.
///
/// There is no delay between fetches; the loop runs as fast as the server
/// answers. It stops on the server's `has_more` flag, independently of the
/// build status.
pub async fn stream_console<S: JobServer, W: Write>(
    server: &S,
    build: &BuildRef,
    deadline: &Deadline,
    out: &mut W,
) -> Result<ConsoleCursor> {
    let mut cursor = ConsoleCursor::default();
    let mut has_more = true;
    while has_more {
        deadline.check(ObserverStage::LogStream)?;
        let chunk = server
            .fetch_console(build, cursor.offset())
            .await
            .map_err(|e| TriggerError::Fetch {
                number: build.number,
                offset: cursor.offset(),
                source: Box::new(e),
            })?;
        if !chunk.content.is_empty() {
            out.write_all(chunk.content.as_bytes())?;
            out.flush()?;
        }
        cursor.advance_to(chunk.next_offset);
        has_more = chunk.has_more;
    }
    tracing::debug!(offset = cursor.offset(), "console stream complete");
    Ok(cursor)
}

// ─── Dual observer ────────────────────────────────────────────────────────

/// Both loops' results, available only after both have exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub state: BuildState,
    pub console: ConsoleCursor,
}

/// Run the status poller and console streamer concurrently against one
/// deadline.
pub async fn observe<S: JobServer, W: Write>(
    server: &S,
    build: &BuildRef,
    poll_interval: Duration,
    deadline: Deadline,
    out: &mut W,
) -> Result<Observation> {
    let (state, console) = tokio::try_join!(
        poll_until_terminal(server, build, poll_interval, &deadline),
        stream_console(server, build, &deadline, out),
    )?;
    Ok(Observation { state, console })
}
