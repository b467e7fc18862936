use std::fmt;
use std::time::Duration;

use crate::{Result, TriggerError};

pub const DEFAULT_TIMEOUT_MINUTES: u64 = 30;
pub const DEFAULT_POLL_MINUTES: u64 = 1;

/// Process configuration, parsed once at startup and passed by reference to
/// every component that needs it.
#[derive(Clone)]
pub struct PluginConfig {
    /// Base URL of the job server, e.g. `https://ci.example.com/jenkins`.
    pub url: String,
    pub username: String,
    /// Password or API token.
    pub password: String,
    /// Job name; `/` separates folder segments.
    pub job_name: String,
    /// Raw JSON object of trigger parameters. May be empty.
    pub trigger_params: String,
    /// Raw git material descriptor:
    /// `<repo>,<checkoutPath>,<branch>,<commit>|<repo2>,…`. May be empty.
    pub git_material: String,
    /// Overall deadline for observing the build.
    pub timeout: Duration,
    /// Sleep between status polls.
    pub poll_interval: Duration,
    /// Map any final status other than `SUCCESS` to a failing exit.
    pub fail_on_unsuccessful: bool,
}

impl PluginConfig {
    pub fn new(url: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: String::new(),
            password: String::new(),
            job_name: job_name.into(),
            trigger_params: String::new(),
            git_material: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_MINUTES * 60),
            poll_interval: Duration::from_secs(DEFAULT_POLL_MINUTES * 60),
            fail_on_unsuccessful: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(TriggerError::Config("server url is not set".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TriggerError::Config(format!(
                "server url '{url}' must start with http:// or https://"
            )));
        }
        if self.job_name.trim().is_empty() {
            return Err(TriggerError::Config("job name is not set".into()));
        }
        if self.timeout.is_zero() {
            return Err(TriggerError::Config(
                "timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for PluginConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("job_name", &self.job_name)
            .field("trigger_params", &self.trigger_params)
            .field("git_material", &self.git_material)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("fail_on_unsuccessful", &self.fail_on_unsuccessful)
            .finish()
    }
}
