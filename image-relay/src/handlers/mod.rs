//! HTTP handlers for the relay.

pub mod generate;
pub mod health;

pub use generate::{generate, JsonPayload, RelayError, PROXY_ERROR_MESSAGE};
pub use health::{health_check, metrics_endpoint};
