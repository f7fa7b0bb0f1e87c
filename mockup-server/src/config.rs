use clap::Parser;
use mockup_ai::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_EDIT_MODEL, DEFAULT_GENERATE_MODEL};
use std::time::Duration;
use thiserror::Error;

/// Runtime configuration, from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mockup-server",
    version,
    about = "Backend proxy for the mockup studio's image generation and editing"
)]
pub struct ServerConfig {
    /// Interface to listen on.
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 3002)]
    pub port: u16,

    /// Upstream API credential. Required.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[arg(long, default_value = DEFAULT_GENERATE_MODEL)]
    pub generate_model: String,

    #[arg(long, default_value = DEFAULT_EDIT_MODEL)]
    pub edit_model: String,

    /// Largest accepted request body.
    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    pub max_body_bytes: usize,

    #[arg(long, default_value_t = 120)]
    pub upstream_timeout_secs: u64,

    /// Requests handled concurrently.
    #[arg(long, default_value_t = 4)]
    pub workers: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check everything needed to serve. A missing key is fatal.
    pub fn validate(&self) -> Result<GeminiConfig, ConfigError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        if self.workers == 0 {
            return Err(ConfigError::Invalid {
                field: "workers",
                reason: "must be at least 1".into(),
            });
        }
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_body_bytes",
                reason: "must be positive".into(),
            });
        }

        Ok(GeminiConfig {
            api_key: api_key.to_string(),
            api_base: self.api_base.clone(),
            generate_model: self.generate_model.clone(),
            edit_model: self.edit_model.clone(),
            timeout: Duration::from_secs(self.upstream_timeout_secs),
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set in environment variables")]
    MissingApiKey,

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
