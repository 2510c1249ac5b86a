//! Client for the local summarization service.
//!
//! The service is a collaborator specified only at its boundary: `POST
//! /summarize` and `POST /suggest` with a JSON body, answering with JSON that
//! carries the human-readable result under one of several keys. Failures
//! never escape the caller as raw errors; callers degrade to a locally
//! formatted fallback string.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Endpoints tried in order; the second covers hosts where `127.0.0.1` and
/// `localhost` resolve differently.
pub const DEFAULT_ENDPOINTS: &[&str] = &["http://127.0.0.1:8765", "http://localhost:8765"];

/// Per-request ceiling across connect and body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Response keys accepted as the result, most specific first.
const RESULT_KEYS: &[&str] = &["summary", "draft", "reply", "result", "text"];

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("summarizer unreachable after {attempts} attempt(s): {last_error}")]
    Unreachable { attempts: usize, last_error: String },
}

/// Request body: either a free-form note, a structured payload, or both.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummarizeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl SummarizeRequest {
    pub fn note(note: impl Into<String>) -> Self {
        SummarizeRequest {
            note: Some(note.into()),
            payload: None,
        }
    }

    pub fn payload(payload: Value) -> Self {
        SummarizeRequest {
            note: None,
            payload: Some(payload),
        }
    }
}

#[derive(Clone)]
pub struct SummarizerClient {
    http: reqwest::Client,
    endpoints: Vec<Url>,
}

impl SummarizerClient {
    pub fn new(endpoints: &[&str]) -> Result<Self> {
        let mut parsed = Vec::with_capacity(endpoints.len());
        for raw in endpoints {
            parsed.push(
                Url::parse(raw).with_context(|| format!("invalid summarizer endpoint: {raw}"))?,
            );
        }
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(SummarizerClient {
            http,
            endpoints: parsed,
        })
    }

    pub fn with_default_endpoints() -> Result<Self> {
        Self::new(DEFAULT_ENDPOINTS)
    }

    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<String, ApiError> {
        self.post("summarize", request).await
    }

    pub async fn suggest(&self, request: &SummarizeRequest) -> Result<String, ApiError> {
        self.post("suggest", request).await
    }

    /// Try each endpoint in order; the first usable response wins. All
    /// failure modes (connect, timeout, non-2xx, unusable body) collapse into
    /// [`ApiError::Unreachable`] carrying the last failure.
    async fn post(&self, route: &str, request: &SummarizeRequest) -> Result<String, ApiError> {
        let mut attempts = 0;
        let mut last_error = "no endpoints configured".to_string();

        for base in &self.endpoints {
            attempts += 1;
            let url = match base.join(route) {
                Ok(u) => u,
                Err(e) => {
                    last_error = e.to_string();
                    continue;
                }
            };
            debug!(%url, "calling summarizer");
            match self.http.post(url.clone()).json(request).send().await {
                Ok(resp) if resp.status().is_success() => match resp.json::<Value>().await {
                    Ok(body) => match extract_result_text(&body) {
                        Some(text) => return Ok(text),
                        None => last_error = format!("unexpected response shape from {url}"),
                    },
                    Err(e) => last_error = format!("invalid JSON from {url}: {e}"),
                },
                Ok(resp) => last_error = format!("{} from {}", resp.status(), url),
                Err(e) => last_error = e.to_string(),
            }
            warn!(%url, error = %last_error, "summarizer endpoint failed, trying next");
        }

        Err(ApiError::Unreachable {
            attempts,
            last_error,
        })
    }
}

/// Pull the human-readable result out of a service response: the first key
/// that is present and a string.
pub fn extract_result_text(body: &Value) -> Option<String> {
    RESULT_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;
