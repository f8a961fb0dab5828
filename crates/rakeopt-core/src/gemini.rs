//! Gemini `generateContent` adapter.
//!
//! Sends a single-turn user prompt to
//! `<base>/<api_version>/models/<model>:generateContent?key=<credential>`
//! and returns the parsed reply envelope. Transport failures, non-success
//! statuses and timeouts all surface as [`OptimizerError::Call`].

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::GeminiConfig;
use crate::error::OptimizerError;
use crate::prompt::PromptText;
use crate::response::Envelope;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Request body for `models/<model>:generateContent`.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub role: &'static str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    /// A single user turn carrying `prompt`.
    pub fn user_prompt(prompt: &'a PromptText) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: prompt.as_str(),
                }],
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for the Gemini API.
///
/// Holds no per-call state; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    /// Client for the public Gemini endpoint with the standard timeout.
    pub fn new() -> reqwest::Result<Self> {
        Self::with_base_url(Self::DEFAULT_BASE_URL, Self::DEFAULT_TIMEOUT)
    }

    /// Client for a custom base URL (e.g. a local fake server in tests).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for `config`, without the credential query parameter.
    pub fn endpoint(&self, config: &GeminiConfig) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, config.api_version, config.model
        )
    }

    /// Send `prompt` to the model and return the raw reply envelope.
    pub async fn generate_content(
        &self,
        config: &GeminiConfig,
        prompt: &PromptText,
    ) -> Result<Envelope, OptimizerError> {
        info!(
            model = %config.model,
            api_version = %config.api_version,
            "calling Gemini model"
        );

        let body = GenerateContentRequest::user_prompt(prompt);
        let response = self
            .http
            .post(self.endpoint(config))
            .query(&[("key", config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = if text.trim().is_empty() {
                status.to_string()
            } else {
                text
            };
            error!(%status, "Gemini optimizer call failed");
            return Err(OptimizerError::Call { message });
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, "Gemini response was not JSON");
            OptimizerError::InvalidEnvelope(e)
        })?;

        let envelope = Envelope::new(value);
        if let Some(usage) = envelope.usage() {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                candidates_tokens = usage.candidates_tokens,
                total_tokens = usage.total_tokens,
                "Gemini token usage"
            );
        }
        Ok(envelope)
    }

    /// Render a reqwest failure without the request URL (it carries the key).
    fn transport_error(&self, err: reqwest::Error) -> OptimizerError {
        let message = if err.is_timeout() {
            format!("request timed out after {}s", self.timeout.as_secs())
        } else {
            err.without_url().to_string()
        };
        error!(error = %message, "Gemini optimizer call failed");
        OptimizerError::Call { message }
    }
}
