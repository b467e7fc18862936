use std::sync::OnceLock;
use std::time::Duration;

use jtrigger_core::{BuildRef, BuildState, ConsoleChunk, JobServer, ServerInfo, TriggerRequest};
use reqwest::header::LOCATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::types::{BuildInfo, Crumb, JobInfo, QueueItem};
use crate::{JenkinsError, Result};

const TEXT_SIZE_HEADER: &str = "X-Text-Size";
const MORE_DATA_HEADER: &str = "X-More-Data";
const VERSION_HEADER: &str = "X-Jenkins";

// ─── Options ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    /// Password or API token.
    pub password: String,
}

impl Credentials {
    /// `None` when no username is given (anonymous access).
    pub fn from_parts(username: &str, password: &str) -> Option<Self> {
        if username.trim().is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout on the underlying HTTP client.
    pub request_timeout: Duration,
    /// Wait between queue-item polls while a build has not started.
    pub queue_poll_interval: Duration,
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            queue_poll_interval: Duration::from_secs(1),
            user_agent: format!("jenkins-trigger/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// ─── JenkinsClient ────────────────────────────────────────────────────────

/// Jenkins JSON API client.
///
/// Cheap to share by reference: all methods take `&self`. The CSRF crumb
/// learned during [`connect`](JobServer::connect) is cached for later POSTs.
#[derive(Debug)]
pub struct JenkinsClient {
    http: reqwest::Client,
    base: Url,
    credentials: Option<Credentials>,
    crumb: OnceLock<Crumb>,
    queue_poll_interval: Duration,
}

impl JenkinsClient {
    pub fn new(url: &str, credentials: Option<Credentials>) -> Result<Self> {
        Self::with_options(url, credentials, ClientOptions::default())
    }

    pub fn with_options(
        url: &str,
        credentials: Option<Credentials>,
        options: ClientOptions,
    ) -> Result<Self> {
        let base = Url::parse(url.trim()).map_err(|e| JenkinsError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(JenkinsError::InvalidUrl {
                url: url.to_string(),
                reason: "expected an http or https url".into(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .user_agent(options.user_agent)
            .cookie_store(true)
            .build()
            .map_err(|source| JenkinsError::Http {
                url: url.to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base,
            credentials,
            crumb: OnceLock::new(),
            queue_poll_interval: options.queue_poll_interval,
        })
    }

    /// Absolute URL for `segments` below the server base.
    pub fn endpoint<I, S>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| JenkinsError::InvalidUrl {
                url: self.base.to_string(),
                reason: "url cannot be a base".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Absolute URL for `rest` below a (possibly foldered) job.
    pub fn job_endpoint(&self, job_name: &str, rest: &[&str]) -> Result<Url> {
        let mut segments = job_segments(job_name);
        segments.extend(rest.iter().map(|s| s.to_string()));
        self.endpoint(segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.credentials {
            Some(c) => builder.basic_auth(&c.username, Some(&c.password)),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response> {
        builder.send().await.map_err(|source| JenkinsError::Http {
            url: url.to_string(),
            source,
        })
    }

    async fn get(&self, url: Url, query: &[(&str, i64)]) -> Result<Response> {
        tracing::debug!(%url, ?query, "GET");
        let builder = self.request(Method::GET, url.clone()).query(query);
        let resp = self.send(builder, &url).await?;
        ensure_success(Method::GET, &url, resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, i64)]) -> Result<T> {
        let resp = self.get(url.clone(), query).await?;
        let body = read_text(resp, &url).await?;
        serde_json::from_str(&body).map_err(|source| JenkinsError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn fetch_crumb(&self) -> Result<Option<Crumb>> {
        let url = self.endpoint(["crumbIssuer", "api", "json"])?;
        let resp = self
            .send(self.request(Method::GET, url.clone()), &url)
            .await?;
        if !resp.status().is_success() {
            tracing::debug!(status = resp.status().as_u16(), "crumb issuer unavailable");
            return Ok(None);
        }
        let body = read_text(resp, &url).await?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| JenkinsError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

impl JobServer for JenkinsClient {
    type Error = JenkinsError;

    async fn connect(&self) -> Result<ServerInfo> {
        let url = self.endpoint(["api", "json"])?;
        let resp = self.get(url, &[]).await?;
        let version = resp
            .headers()
            .get(VERSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if let Some(crumb) = self.fetch_crumb().await? {
            tracing::debug!(field = %crumb.crumb_request_field, "using CSRF crumb");
            let _ = self.crumb.set(crumb);
        }
        Ok(ServerInfo { version })
    }

    async fn trigger(&self, request: &TriggerRequest) -> Result<i64> {
        let job: JobInfo = self
            .get_json(self.job_endpoint(&request.job_name, &["api", "json"])?, &[])
            .await?;
        if job.in_queue {
            tracing::info!(job = %request.job_name, "job is already queued");
            return Ok(0);
        }

        let parameterized = job.is_parameterized();
        if parameterized {
            let defined: Vec<&str> = job
                .property
                .iter()
                .flat_map(|p| &p.parameter_definitions)
                .map(|d| d.name.as_str())
                .collect();
            tracing::debug!(job = %request.job_name, ?defined, "job is parameterized");
        }
        let action = if parameterized || !request.params.is_empty() {
            "buildWithParameters"
        } else {
            "build"
        };
        let url = self.job_endpoint(&request.job_name, &[action])?;
        tracing::debug!(%url, "POST");

        let mut builder = self.request(Method::POST, url.clone());
        if let Some(crumb) = self.crumb.get() {
            builder = builder.header(crumb.crumb_request_field.as_str(), crumb.crumb.as_str());
        }
        if !request.params.is_empty() {
            builder = builder.form(&request.params);
        }
        let resp = self.send(builder, &url).await?;
        if !matches!(resp.status(), StatusCode::OK | StatusCode::CREATED) {
            return Err(JenkinsError::Status {
                method: Method::POST,
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| JenkinsError::MissingLocation {
                job: request.job_name.clone(),
            })?;
        parse_queue_id(location)
    }

    async fn resolve_build_from_queue(&self, job_name: &str, queue_id: i64) -> Result<BuildRef> {
        let url = self.endpoint(["queue", "item", &queue_id.to_string(), "api", "json"])?;
        loop {
            let item: QueueItem = self.get_json(url.clone(), &[]).await?;
            if item.cancelled.unwrap_or(false) {
                return Err(JenkinsError::QueueCancelled { queue_id });
            }
            if let Some(executable) = item.executable {
                tracing::debug!(
                    queue_id,
                    number = executable.number,
                    url = executable.url.as_deref().unwrap_or(""),
                    "queue item left the queue"
                );
                return Ok(BuildRef {
                    job_name: job_name.to_string(),
                    number: executable.number,
                    queue_id,
                });
            }
            tracing::debug!(
                queue_id,
                why = item.why.as_deref().unwrap_or(""),
                "build has not left the queue yet"
            );
            tokio::time::sleep(self.queue_poll_interval).await;
        }
    }

    async fn poll_status(&self, build: &BuildRef, depth: u32) -> Result<BuildState> {
        let number = build.number.to_string();
        let url = self.job_endpoint(&build.job_name, &[number.as_str(), "api", "json"])?;
        let info: BuildInfo = self.get_json(url, &[("depth", i64::from(depth))]).await?;
        Ok(BuildState {
            number: info.number,
            result: info.result.filter(|r| !r.as_str().is_empty()),
            building: info.building,
        })
    }

    async fn fetch_console(&self, build: &BuildRef, offset: i64) -> Result<ConsoleChunk> {
        let number = build.number.to_string();
        let url = self.job_endpoint(
            &build.job_name,
            &[number.as_str(), "logText", "progressiveText"],
        )?;
        let resp = self.get(url.clone(), &[("start", offset)]).await?;

        let headers = resp.headers();
        let text_size = headers
            .get(TEXT_SIZE_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<i64>().ok());
        let has_more = headers
            .get(MORE_DATA_HEADER)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));

        let body = resp.bytes().await.map_err(|source| JenkinsError::Http {
            url: url.to_string(),
            source,
        })?;
        // the fallback offset counts raw bytes, before any lossy decoding
        let next_offset = text_size.unwrap_or(offset + body.len() as i64);
        let content = String::from_utf8_lossy(&body).into_owned();
        Ok(ConsoleChunk {
            content,
            next_offset,
            has_more,
        })
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────

/// `folder/app` → `["job", "folder", "job", "app"]`.
fn job_segments(job_name: &str) -> Vec<String> {
    job_name
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .flat_map(|s| ["job".to_string(), s.to_string()])
        .collect()
}

/// Queue id from a trigger `Location` such as `https://ci/queue/item/42/`.
fn parse_queue_id(location: &str) -> Result<i64> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|id| id.parse::<i64>().ok())
        .ok_or_else(|| JenkinsError::InvalidQueueLocation(location.to_string()))
}

fn ensure_success(method: Method, url: &Url, resp: Response) -> Result<Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(JenkinsError::Status {
            method,
            url: url.to_string(),
            status: resp.status().as_u16(),
        })
    }
}

async fn read_text(resp: Response, url: &Url) -> Result<String> {
    resp.text().await.map_err(|source| JenkinsError::Http {
        url: url.to_string(),
        source,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────
