//! Gemini upstream client.
//!
//! Forwards an already-serialized JSON payload to `generateContent` and hands
//! back the upstream status with its body untouched.

use crate::config::GeminiConfig;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde_json::value::RawValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The call never produced a complete response (connect, TLS, body read).
    /// The wrapped error has its URL stripped because the query holds the API key.
    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("Upstream returned {status} with a non-JSON body: {source}")]
    InvalidJson {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        UpstreamError::Transport(err.without_url())
    }
}

/// Upstream body as it should be relayed.
#[derive(Debug)]
pub enum UpstreamBody {
    /// Well-formed JSON, kept byte-for-byte.
    Json(Box<RawValue>),
    /// Anything that failed to parse as JSON (error responses only).
    Text(String),
}

#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: UpstreamBody,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().build()?;
        Ok(Self { config, client })
    }

    /// `generateContent` URL for the configured model, without the key.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// POST `payload` upstream and collect the response.
    ///
    /// Non-success statuses are returned as `Ok`: they are relayed, not failed.
    pub async fn forward(&self, payload: &RawValue) -> Result<UpstreamResponse, UpstreamError> {
        tracing::debug!(
            model = %self.config.model,
            payload_len = payload.get().len(),
            "Forwarding request to Gemini API"
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.config.api_key.expose_secret())])
            .header(CONTENT_TYPE, "application/json")
            .body(payload.get().to_owned())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %text,
                "Gemini API error"
            );

            let body = match serde_json::from_str::<Box<RawValue>>(&text) {
                Ok(json) => UpstreamBody::Json(json),
                Err(_) => UpstreamBody::Text(text),
            };
            return Ok(UpstreamResponse { status, body });
        }

        // Success bodies are expected to be JSON; anything else is a relay failure.
        let json = serde_json::from_str::<Box<RawValue>>(&text)
            .map_err(|source| UpstreamError::InvalidJson { status, source })?;

        Ok(UpstreamResponse {
            status,
            body: UpstreamBody::Json(json),
        })
    }
}
