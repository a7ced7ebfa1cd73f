//! `POST /generate`: relay a browser payload to Gemini and the answer back.

use crate::services::{UpstreamBody, UpstreamError, UpstreamResponse};
use crate::startup::AppState;
use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::BytesRejection, FromRequest, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, value::RawValue};
use thiserror::Error;

/// Body message for every failure inside the relay itself.
pub const PROXY_ERROR_MESSAGE: &str = "An internal server error occurred on the proxy.";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Internal proxy error");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": { "message": PROXY_ERROR_MESSAGE } })),
        )
            .into_response()
    }
}

/// Request body that has been checked to be JSON but is otherwise left as sent.
///
/// The `Content-Type` header is not inspected: browsers default to
/// `text/plain` for `fetch` bodies.
#[derive(Debug)]
pub struct JsonPayload(pub Box<RawValue>);

#[derive(Debug, Error)]
pub enum PayloadRejection {
    #[error("Failed to parse the request body as JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error(transparent)]
    Body(#[from] BytesRejection),
}

impl IntoResponse for PayloadRejection {
    fn into_response(self) -> Response {
        match self {
            PayloadRejection::InvalidJson(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            // Includes 413 when the body exceeds the configured limit.
            PayloadRejection::Body(rejection) => rejection.into_response(),
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = PayloadRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        let raw = serde_json::from_slice::<Box<RawValue>>(&bytes)
            .map_err(PayloadRejection::InvalidJson)?;

        Ok(JsonPayload(raw))
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        match self.body {
            UpstreamBody::Json(json) => (self.status, Json(json)).into_response(),
            UpstreamBody::Text(text) => (
                self.status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                text,
            )
                .into_response(),
        }
    }
}

/// The payload is never deserialized into a typed model, so it reaches the
/// upstream exactly as the caller sent it.
pub async fn generate(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> Result<UpstreamResponse, RelayError> {
    Ok(state.gemini.forward(&payload).await?)
}
