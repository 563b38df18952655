//! HTTP client wrapper
//!
//! A single configured sender for the clinic API: fixed base URL, fixed
//! request timeout, JSON bodies, and a bearer token attached to every request
//! whenever the token source has one. Errors are returned as-is; this layer
//! never retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::ApiErrorResponse;
use super::session::TokenSource;
use crate::core::config::Config;

/// Errors surfaced by the HTTP client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server responded with {status}")]
    Status {
        status: StatusCode,
        /// Raw response body, if the server sent one
        body: Option<String>,
    },

    #[error("Unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable `message` from the server's error body, if any
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Status {
            body: Some(body), ..
        } = self
        else {
            return None;
        };

        serde_json::from_str::<ApiErrorResponse>(body)
            .ok()
            .and_then(|err| err.message)
            .filter(|message| !message.is_empty())
    }

    /// HTTP status of the failed response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_builder() {
            ApiError::Build(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configured JSON client for the clinic API
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    token_source: Option<Arc<dyn TokenSource>>,
}

impl ApiClient {
    /// Create a client with the configured base URL and timeout
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        // The timeout is set per request; the wasm client builder has no timeout
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            timeout: config.request_timeout,
            token_source: None,
        })
    }

    /// Attach bearer tokens read from `source` to every request
    pub fn with_token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.token_source = Some(source);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .http
            .request(method, self.url(path))
            .timeout(self.timeout);

        match self
            .token_source
            .as_ref()
            .and_then(|source| source.access_token())
        {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    /// `GET path` and decode the JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        tracing::debug!("GET {}", path);
        self.send(self.request(Method::GET, path)).await
    }

    /// `POST path` with a JSON body and decode the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", path);
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                body: (!body.is_empty()).then_some(body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("has_token_source", &self.token_source.is_some())
            .finish()
    }
}
