//! Scripted [`JobServer`] double for unit tests.
//!
//! Each operation pops its next response from a queue. When a queue runs dry
//! the server falls back to a neutral answer: connect succeeds, polls report a
//! running build, console fetches return no text with more to come. Trigger
//! and queue resolution fail so a missing script is loud.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::build::{BuildRef, BuildState, ConsoleChunk};
use crate::params::TriggerRequest;
use crate::server::{JobServer, ServerInfo};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct ScriptError(pub String);

type Scripted<T> = Mutex<VecDeque<Result<T, String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Connect,
    Trigger(String),
    ResolveQueue(i64),
    Poll(i64),
    Fetch(i64),
}

#[derive(Default)]
pub(crate) struct ScriptedServer {
    connects: Scripted<ServerInfo>,
    triggers: Scripted<i64>,
    queue: Scripted<BuildRef>,
    polls: Scripted<BuildState>,
    fetches: Scripted<ConsoleChunk>,
    calls: Mutex<Vec<Call>>,
    latency: Duration,
}

impl ScriptedServer {
    pub(crate) fn new() -> Self {
        Self {
            latency: Duration::from_secs(1),
            ..Default::default()
        }
    }

    pub(crate) fn connect_err(self, msg: &str) -> Self {
        push(&self.connects, Err(msg.to_string()));
        self
    }

    pub(crate) fn trigger_ok(self, queue_id: i64) -> Self {
        push(&self.triggers, Ok(queue_id));
        self
    }

    pub(crate) fn trigger_err(self, msg: &str) -> Self {
        push(&self.triggers, Err(msg.to_string()));
        self
    }

    pub(crate) fn queue_ok(self, build: BuildRef) -> Self {
        push(&self.queue, Ok(build));
        self
    }

    pub(crate) fn queue_err(self, msg: &str) -> Self {
        push(&self.queue, Err(msg.to_string()));
        self
    }

    pub(crate) fn poll_ok(self, state: BuildState) -> Self {
        push(&self.polls, Ok(state));
        self
    }

    pub(crate) fn poll_err(self, msg: &str) -> Self {
        push(&self.polls, Err(msg.to_string()));
        self
    }

    pub(crate) fn fetch_ok(self, content: &str, next_offset: i64, has_more: bool) -> Self {
        push(
            &self.fetches,
            Ok(ConsoleChunk {
                content: content.to_string(),
                next_offset,
                has_more,
            }),
        );
        self
    }

    pub(crate) fn fetch_err(self, msg: &str) -> Self {
        push(&self.fetches, Err(msg.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        tokio::time::sleep(self.latency).await;
    }
}

fn push<T>(queue: &Scripted<T>, item: Result<T, String>) {
    queue.lock().unwrap().push_back(item);
}

fn pop<T>(queue: &Scripted<T>) -> Option<Result<T, ScriptError>> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .map(|r| r.map_err(ScriptError))
}

pub(crate) fn build_ref(number: i64) -> BuildRef {
    BuildRef {
        job_name: "deploy".into(),
        number,
        queue_id: 17,
    }
}

pub(crate) fn finished(number: i64, result: &str) -> BuildState {
    BuildState {
        number,
        result: Some(result.into()),
        building: false,
    }
}

impl JobServer for ScriptedServer {
    type Error = ScriptError;

    async fn connect(&self) -> Result<ServerInfo, ScriptError> {
        self.record(Call::Connect).await;
        pop(&self.connects).unwrap_or_else(|| {
            Ok(ServerInfo {
                version: Some("2.440".into()),
            })
        })
    }

    async fn trigger(&self, request: &TriggerRequest) -> Result<i64, ScriptError> {
        self.record(Call::Trigger(request.job_name.clone())).await;
        pop(&self.triggers).unwrap_or_else(|| Err(ScriptError("no trigger scripted".into())))
    }

    async fn resolve_build_from_queue(
        &self,
        _job_name: &str,
        queue_id: i64,
    ) -> Result<BuildRef, ScriptError> {
        self.record(Call::ResolveQueue(queue_id)).await;
        pop(&self.queue).unwrap_or_else(|| Err(ScriptError("no queue entry scripted".into())))
    }

    async fn poll_status(&self, build: &BuildRef, _depth: u32) -> Result<BuildState, ScriptError> {
        self.record(Call::Poll(build.number)).await;
        pop(&self.polls).unwrap_or_else(|| Ok(BuildState::pending(build.number)))
    }

    async fn fetch_console(&self, _build: &BuildRef, offset: i64) -> Result<ConsoleChunk, ScriptError> {
        self.record(Call::Fetch(offset)).await;
        pop(&self.fetches).unwrap_or_else(|| {
            Ok(ConsoleChunk {
                content: String::new(),
                next_offset: offset,
                has_more: true,
            })
        })
    }
}
