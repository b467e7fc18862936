//! `jtrigger-core`: trigger a remote CI job and follow it to completion.
//!
//! The crate owns the protocol; the transport is supplied by the caller as a
//! [`JobServer`] implementation (see the `jenkins-client` crate).
//!
//! ```text
//! PluginConfig
//!     │
//!     ▼
//! params::resolve_params      ← trigger JSON + git material placeholders
//!     │
//!     ▼
//! launcher                    ← connect (one retry), trigger, queue → build
//!     │
//!     ▼
//! observer::observe           ← status poller ∥ console streamer, one deadline
//!     │
//!     ▼
//! report                      ← final status line
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod launcher;
pub mod observer;
pub mod params;
pub mod report;
pub mod runner;
pub mod server;

#[cfg(test)]
pub(crate) mod testutil;

pub use build::{BuildRef, BuildResult, BuildState, ConsoleChunk};
pub use config::PluginConfig;
pub use error::{ObserverStage, Result, TriggerError};
pub use params::{GitMaterial, TriggerRequest};
pub use report::FinalStatus;
pub use runner::{run, RunOutcome};
pub use server::{JobServer, ServerInfo};
