/// Async HTTP client for the remote scoring service.

use std::time::Duration;
use tracing::debug;

use super::wire::{Reply, Request, StepBody, StoreResponseBody};
use crate::error::ApiError;

const USER_AGENT: &str = concat!("SampleRater/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper around a `reqwest::Client` bound to one service root.
///
/// Cloning is cheap (the underlying connection pool is shared), so a copy
/// can be moved into every background task.
#[derive(Debug, Clone)]
pub struct ScoringClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScoringClient {
    /// Build a client for the service at `base_url` (trailing slashes are ignored).
    ///
    /// `timeout` bounds each whole round trip; a hung connection surfaces
    /// as `ApiError::Transport` once it elapses.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, request: &Request) -> String {
        format!("{}{}", self.base_url, request.path())
    }

    /// Send one request and interpret the reply.
    /// No retries: a failure is returned to the caller as-is.
    pub async fn send(&self, request: Request) -> Result<Reply, ApiError> {
        let url = self.url(&request);
        debug!("➡️  {} {:?}", url, request);

        let builder = match &request {
            Request::Current { coder } => self.http.get(&url).query(&[("coder", coder)]),
            Request::Sample { coder, number } => self
                .http
                .get(&url)
                .query(&[("num", number.to_string()), ("coder", coder.clone())]),
            Request::StoreResponse { coder, folder, number, choice } => {
                self.http.post(&url).json(&StoreResponseBody {
                    coder,
                    sample_folder: folder,
                    sample_number: *number,
                    result: *choice,
                })
            }
            Request::Previous { coder, number } | Request::Next { coder, number } => self
                .http
                .post(&url)
                .json(&StepBody { coder, sample_number: *number }),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("⬅️  {} answered {}", url, status);
        Reply::parse(status, &body)
    }
}
