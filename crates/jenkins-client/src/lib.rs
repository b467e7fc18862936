//! `jenkins-client`: async client for the Jenkins JSON API.
//!
//! [`JenkinsClient`] implements [`jtrigger_core::JobServer`], covering the
//! five calls the trigger-and-observe protocol needs:
//!
//! | Operation | Endpoint |
//! |---|---|
//! | connect | `GET api/json` (+ `GET crumbIssuer/api/json`) |
//! | trigger | `GET job/<path>/api/json`, then `POST job/<path>/build[WithParameters]` |
//! | resolve queue | `GET queue/item/<id>/api/json` until `executable` is set |
//! | poll status | `GET job/<path>/<n>/api/json?depth=<d>` |
//! | fetch console | `GET job/<path>/<n>/logText/progressiveText?start=<offset>` |
//!
//! ```rust,ignore
//! use jenkins_client::{Credentials, JenkinsClient};
//! use jtrigger_core::{run, PluginConfig};
//!
//! let config = PluginConfig::new("https://ci.example.com", "deploy");
//! let client = JenkinsClient::new(&config.url, Credentials::from_parts("bot", "token"))?;
//! let outcome = run(&client, &config, &mut std::io::stdout()).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientOptions, Credentials, JenkinsClient};
pub use error::JenkinsError;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, JenkinsError>;
