//! Configuration management

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Fixed experiment name used for every tracking run
pub const EXPERIMENT_NAME: &str = "genai-translations";

/// Fixed model identifier sent with every completion request
pub const MODEL_ID: &str = "gemini-2.5-flash";

/// Default OpenAI-compatible endpoint in front of Gemini
const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";

/// Default tracking server address (MLflow container on the demo network)
const DEFAULT_TRACKING_URI: &str = "http://mlflow-server:5000";

/// Immutable process-wide configuration, read once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model_id: String,
    pub tracking_uri: String,
    pub experiment_name: String,
    pub timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model_id: MODEL_ID.to_string(),
            tracking_uri: DEFAULT_TRACKING_URI.to_string(),
            experiment_name: EXPERIMENT_NAME.to_string(),
            timeout_ms: 30000,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Never fails: a missing `GEMINI_API_KEY` leaves the credential unset
    /// and every translation degrades to a fixed configuration error.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        if api_key.is_none() {
            warn!("GEMINI_API_KEY is not set; translations will be rejected");
        }

        let api_base_url = std::env::var("API_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let tracking_uri = std::env::var("MLFLOW_TRACKING_URI")
            .unwrap_or_else(|_| DEFAULT_TRACKING_URI.to_string());

        let timeout_ms = std::env::var("REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30000);

        Self {
            api_key,
            api_base_url,
            model_id: MODEL_ID.to_string(),
            tracking_uri,
            experiment_name: EXPERIMENT_NAME.to_string(),
            timeout_ms,
        }
    }

    /// Whether a model credential was supplied at startup
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_base_url.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if self.tracking_uri.is_empty() {
            return Err(anyhow::anyhow!("Tracking URI is required"));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(!config.has_api_key());
        assert_eq!(config.model_id, "gemini-2.5-flash");
        assert_eq!(config.experiment_name, "genai-translations");
        assert_eq!(config.tracking_uri, "http://mlflow-server:5000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_endpoint() {
        let config = AppConfig {
            api_base_url: String::new(),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_has_api_key() {
        let config = AppConfig {
            api_key: Some("test_key".to_string()),
            ..Default::default()
        };

        assert!(config.has_api_key());
    }
}
