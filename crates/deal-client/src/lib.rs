//! # deal-client
//!
//! HTTP client for the CRM's REST API.
//!
//! [`CrmClient::send`] performs exactly one request and returns the status
//! plus the parsed body; it never retries. The per-resource modules wrap
//! `send` with typed payloads and check each endpoint's contract (status,
//! `success` envelope, entity key, required fields) via [`envelope`].

pub mod envelope;

mod agent;
mod alerts;
mod checklist;
mod deals;
mod error;
mod transactions;

pub use envelope::{Envelope, Observed};
pub use error::{ClientError, ContractError};
pub use transactions::TransitionOutcome;

use std::time::{Duration, Instant};

use deal_config::ApiConfig;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;

pub use reqwest::Method;

/// Which timeout budget a call gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTimeout {
    /// Plain CRUD endpoints.
    Standard,
    /// Endpoints that wait on a model (stage validation, summaries, agent commands).
    Ai,
}

/// Response body as received: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    fn parse(text: String) -> Self {
        serde_json::from_str(&text).map_or(Self::Text(text), Self::Json)
    }

    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Compact rendering for diagnostics, capped at a few hundred characters.
    #[must_use]
    pub fn render(&self) -> String {
        const LIMIT: usize = 400;
        let full = match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        };
        if full.chars().count() <= LIMIT {
            return full;
        }
        let mut truncated: String = full.chars().take(LIMIT).collect();
        truncated.push('…');
        truncated
    }
}

/// Status code and body of one CRM call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Drain a `reqwest` response into status + body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the body cannot be read.
    pub async fn read(response: reqwest::Response) -> Result<Self, ClientError> {
        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok(Self {
            status,
            body: ResponseBody::parse(text),
        })
    }
}

/// Client for the CRM REST API.
#[derive(Debug, Clone)]
pub struct CrmClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    ai_timeout: Duration,
}

impl CrmClient {
    /// Build a client from the `[api]` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the base URL does not parse and
    /// [`ClientError::Transport`] if the HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = config.normalized_base_url().to_string();
        reqwest::Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("dealprobe/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            request_timeout: config.request_timeout(),
            ai_timeout: config.ai_timeout(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    const fn timeout_for(&self, timeout: CallTimeout) -> Duration {
        match timeout {
            CallTimeout::Standard => self.request_timeout,
            CallTimeout::Ai => self.ai_timeout,
        }
    }

    /// Perform one request against `base_url + path`.
    ///
    /// Any status code is returned as-is; only transport failures are errors.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] on connection failure, timeout, or
    /// an unreadable body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        timeout: CallTimeout,
    ) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{path}", self.base_url);
        let started = Instant::now();

        let mut request = self
            .http
            .request(method.clone(), &url)
            .timeout(self.timeout_for(timeout));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(%method, path, error = %e, "CRM request failed");
        })?;
        let response = ApiResponse::read(response).await?;

        tracing::debug!(
            %method,
            path,
            status = response.status,
            elapsed = ?started.elapsed(),
            "CRM call"
        );
        Ok(response)
    }

    /// Serialize `payload` and [`send`](Self::send) it.
    async fn send_json<T: serde::Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        payload: &T,
        timeout: CallTimeout,
    ) -> Result<ApiResponse, ClientError> {
        let body = serde_json::to_value(payload)?;
        self.send(method, path, Some(&body), timeout).await
    }
}

/// Append `pairs` to `path` as a URL-encoded query string.
#[must_use]
pub fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}
