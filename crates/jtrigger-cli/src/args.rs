use std::time::Duration;

use clap::{ArgAction, Parser};
use jtrigger_core::config::{DEFAULT_POLL_MINUTES, DEFAULT_TIMEOUT_MINUTES};
use jtrigger_core::PluginConfig;

/// Every option can also come from the environment, using the variable
/// names CI plugin runners already export.
#[derive(Parser)]
#[command(
    name = "jenkins-trigger",
    about = "Trigger a Jenkins job, stream its console and report the final status",
    version
)]
pub struct Cli {
    /// Jenkins server url
    #[arg(long, env = "URL")]
    pub url: String,

    /// Username for basic auth (omit for anonymous access)
    #[arg(long, env = "USERNAME", default_value = "")]
    pub username: String,

    /// Password or API token
    #[arg(long, env = "PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Job to trigger; `folder/job` addresses a job inside a folder
    #[arg(long, env = "JOB_NAME")]
    pub job_name: String,

    /// Build parameters as a JSON object of strings
    #[arg(long, env = "JOB_TRIGGER_PARAMS", default_value = "")]
    pub job_trigger_params: String,

    /// Git materials: `repo,checkout-path,branch,commit` entries joined by `|`
    #[arg(long, env = "GIT_MATERIAL_REQUEST", default_value = "")]
    pub git_material_request: String,

    /// Give up after this many minutes of observing the build
    #[arg(long, env = "JENKINS_PLUGIN_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_MINUTES)]
    pub timeout_minutes: u64,

    /// Minutes between build status polls
    #[arg(long, env = "BUILD_STATUS_POLL_DURATION", default_value_t = DEFAULT_POLL_MINUTES)]
    pub poll_minutes: u64,

    /// Seconds between build status polls (overrides --poll-minutes)
    #[arg(long, env = "BUILD_STATUS_POLL_SECONDS")]
    pub poll_seconds: Option<u64>,

    /// Exit non-zero unless the build finishes with SUCCESS
    #[arg(long, env = "FAIL_ON_UNSUCCESSFUL")]
    pub fail_on_unsuccessful: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }

    pub fn into_config(self) -> PluginConfig {
        let poll_interval = match self.poll_seconds {
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(self.poll_minutes.saturating_mul(60)),
        };
        PluginConfig {
            url: self.url,
            username: self.username,
            password: self.password,
            job_name: self.job_name,
            trigger_params: self.job_trigger_params,
            git_material: self.git_material_request,
            timeout: Duration::from_secs(self.timeout_minutes.saturating_mul(60)),
            poll_interval,
            fail_on_unsuccessful: self.fail_on_unsuccessful,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Cli {
        let mut argv = vec![
            "jenkins-trigger",
            "--url",
            "https://ci.example.com",
            "--job-name",
            "deploy",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn minutes_are_converted() {
        let config = parse(&["--timeout-minutes", "5", "--poll-minutes", "2"]).into_config();
        assert_eq!(config.timeout, Duration::from_secs(300));
        assert_eq!(config.poll_interval, Duration::from_secs(120));
    }

    #[test]
    fn poll_seconds_win_over_minutes() {
        let config = parse(&["--poll-minutes", "2", "--poll-seconds", "0"]).into_config();
        assert_eq!(config.poll_interval, Duration::ZERO);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(parse(&[]).log_level(), tracing::Level::WARN);
        assert_eq!(parse(&["-v"]).log_level(), tracing::Level::INFO);
        assert_eq!(parse(&["-vvv"]).log_level(), tracing::Level::DEBUG);
    }
}
