//! Runtime configuration supplied by the shell at start-up.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::error::{AppError, ErrorKind};

pub const DEFAULT_ANALYSIS_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEOLOCATION_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 1_500;
/// Points a returning user is shown with; history is not persisted.
pub const DEFAULT_RESTORED_POINTS: u32 = 1_250;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid analysis endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("analysis model name cannot be empty")]
    EmptyModel,

    #[error("geolocation timeout must be greater than zero")]
    ZeroGeolocationTimeout,
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Configuration, e.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub endpoint: String,
    pub model: String,
    /// Without a key every analysis yields the fallback text.
    pub api_key: Option<SecretString>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ANALYSIS_ENDPOINT.to_string(),
            model: DEFAULT_ANALYSIS_MODEL.to_string(),
            api_key: None,
        }
    }
}

impl AnalysisConfig {
    /// `{endpoint}/models/{model}:generateContent`
    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShareConfig {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            title: "Heritage Guard designed by S-Robot".to_string(),
            text: "Check out our FLL project for protecting heritage! \
                   Help us report findings and looting."
                .to_string(),
            url: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub geolocation_timeout_ms: u64,
    pub submit_delay_ms: u64,
    pub restored_points: u32,
    pub share: ShareConfig,
    pub feedback_email: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            geolocation_timeout_ms: DEFAULT_GEOLOCATION_TIMEOUT_MS,
            submit_delay_ms: DEFAULT_SUBMIT_DELAY_MS,
            restored_points: DEFAULT_RESTORED_POINTS,
            share: ShareConfig::default(),
            feedback_email: "feedback@s-robot-fll.org".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        // serde would accept a sequence as the positional form of the struct
        if !value.is_object() {
            return Err(ConfigError::Parse(serde::de::Error::custom(
                "config must be a JSON object",
            )));
        }
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = &self.analysis.endpoint;
        let parsed = Url::parse(endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: endpoint.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        if self.analysis.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }

        if self.geolocation_timeout_ms == 0 {
            return Err(ConfigError::ZeroGeolocationTimeout);
        }

        Ok(())
    }
}
