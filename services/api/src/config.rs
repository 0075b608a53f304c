//! Service configuration loaded from the process environment

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the API service
///
/// # Environment Variables
/// - `GOOGLE_API_KEY`: API key for the Gemini text-generation API (required)
/// - `SECRET_KEY`: Shared secret used to sign access tokens (required)
/// - `ALGORITHM`: Token signing algorithm, e.g. `HS256` (required)
/// - `GEMINI_MODEL`: Model name (default: `gemini-2.5-pro-exp-03-25`)
/// - `ACCESS_TOKEN_EXPIRE_MINUTES`: Access token lifetime (default: 30)
/// - `BIND_ADDRESS`: Listen address (default: `0.0.0.0:8000`)
/// - `TEMPLATES_DIR`: Directory holding project templates (default: `templates`)
/// - `CHAT_CHUNK_DELAY_MS`: Pause between streamed chat chunks (default: 100)
///
/// The database connection string is read separately by
/// [`common::database::DatabaseConfig::from_env`].
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub google_api_key: String,
    pub secret_key: String,
    pub algorithm: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default = "default_chat_chunk_delay_ms")]
    pub chat_chunk_delay_ms: u64,
}

fn default_gemini_model() -> String {
    "gemini-2.5-pro-exp-03-25".to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_chat_chunk_delay_ms() -> u64 {
    100
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(Environment::default())
            .build()
            .context("Failed to read configuration from environment")?
            .try_deserialize()
            .context("Invalid or incomplete configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("GOOGLE_API_KEY", &self.google_api_key),
            ("SECRET_KEY", &self.secret_key),
            ("ALGORITHM", &self.algorithm),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{} must not be empty", name);
            }
        }

        if self.access_token_expire_minutes <= 0 {
            anyhow::bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
        }

        Ok(())
    }

    /// Lifetime of issued access tokens
    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.access_token_expire_minutes)
    }

    /// Pause inserted between streamed chat chunks
    pub fn chat_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chat_chunk_delay_ms)
    }
}
