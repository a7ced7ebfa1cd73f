pub mod gemini;

pub use gemini::{GeminiClient, UpstreamBody, UpstreamError, UpstreamResponse};
