use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

/// Upstream API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Image-capable model the browser client is written against.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Directory holding the prebuilt browser client.
pub const DEFAULT_STATIC_DIR: &str = "docs";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub common: core_config::Config,
    pub gemini: GeminiConfig,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
}

impl RelayConfig {
    /// Load from `.env`, the optional configuration file and the process environment.
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Resolve relay settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = get_env(&lookup, API_KEY_ENV, None)?;

        Ok(RelayConfig {
            common,
            gemini: GeminiConfig {
                api_key: Secret::new(api_key),
                model: get_env(&lookup, "GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL))?,
                api_base: get_env(&lookup, "GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE))?
                    .trim_end_matches('/')
                    .to_string(),
            },
            static_dir: PathBuf::from(get_env(&lookup, "STATIC_DIR", Some(DEFAULT_STATIC_DIR))?),
        })
    }
}

// Empty values count as unset.
fn get_env<F>(lookup: &F, key: &str, default: Option<&str>) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|val| !val.is_empty()) {
        Some(val) => Ok(val),
        None => match default {
            Some(def) => Ok(def.to_string()),
            None => Err(AppError::ConfigError(anyhow::anyhow!(
                "{} is not set",
                key
            ))),
        },
    }
}
