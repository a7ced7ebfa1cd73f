#![allow(dead_code)]

use image_relay::config::{GeminiConfig, RelayConfig};
use image_relay::startup::Application;
use secrecy::Secret;
use service_core::config::Config;
use std::path::PathBuf;
use std::time::Duration;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_MODEL: &str = "gemini-test-model";

/// Path the relay should hit on the fake upstream.
pub fn upstream_path() -> String {
    format!("/v1beta/models/{}:generateContent", TEST_MODEL)
}

pub fn test_config(api_base: String, static_dir: PathBuf) -> RelayConfig {
    RelayConfig {
        common: Config {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
        },
        gemini: GeminiConfig {
            api_key: Secret::new(TEST_API_KEY.to_string()),
            model: TEST_MODEL.to_string(),
            api_base,
        },
        static_dir,
    }
}

/// An `api_base` on which nothing is listening.
pub fn unreachable_api_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/v1beta", port)
}

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the relay against `upstream_uri` (a wiremock server URI).
    pub async fn spawn(upstream_uri: &str) -> Self {
        Self::spawn_with(
            format!("{}/v1beta", upstream_uri),
            PathBuf::from("does-not-exist"),
        )
        .await
    }

    pub async fn spawn_with(api_base: String, static_dir: PathBuf) -> Self {
        let app = Application::build(test_config(api_base, static_dir))
            .await
            .expect("Failed to build test application");

        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build client");

        Self { address, client }
    }

    pub async fn post_generate(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.client
            .post(format!("{}/generate", self.address))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}
