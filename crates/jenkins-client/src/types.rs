//! Wire shapes of the Jenkins JSON API responses this client reads.
//!
//! Only the fields the protocol needs are modelled; everything else in the
//! (large) Jenkins payloads is ignored.

use jtrigger_core::BuildResult;
use serde::Deserialize;

/// `GET job/<path>/api/json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    /// True while a build of this job is waiting in the queue.
    #[serde(default)]
    pub in_queue: bool,
    /// Job properties; parameter definitions live under one of them.
    #[serde(default)]
    pub property: Vec<JobProperty>,
}

impl JobInfo {
    /// A parameterized job only accepts `buildWithParameters`, even when no
    /// values are supplied (Jenkins then uses the defaults).
    pub fn is_parameterized(&self) -> bool {
        self.property
            .iter()
            .any(|p| !p.parameter_definitions.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProperty {
    #[serde(default)]
    pub parameter_definitions: Vec<ParameterDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
}

/// `GET queue/item/<id>/api/json`
#[derive(Debug, Clone, Deserialize)]
pub struct QueueItem {
    #[serde(default)]
    pub cancelled: Option<bool>,
    /// Set once the queue entry has been turned into a build.
    #[serde(default)]
    pub executable: Option<Executable>,
    /// Human readable reason the item is still waiting.
    #[serde(default)]
    pub why: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Executable {
    pub number: i64,
    #[serde(default)]
    pub url: Option<String>,
}

/// `GET job/<path>/<number>/api/json`
#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    pub number: i64,
    /// `null` while the build is running.
    #[serde(default)]
    pub result: Option<BuildResult>,
    #[serde(default)]
    pub building: bool,
}

/// `GET crumbIssuer/api/json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Crumb {
    pub crumb: String,
    pub crumb_request_field: String,
}
