//! Chat-completion model client

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::core::config::AppConfig;
use crate::core::errors::ModelError;
use crate::core::models::ChatMessage;

/// Boundary to the hosted chat-completion model.
///
/// All failure kinds (auth, network, rate limiting, malformed response,
/// timeout) surface as [`ModelError`] and are treated uniformly by callers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send role-tagged messages, return the generated text
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError>;

    /// Identifier of the model answering the requests
    fn model_id(&self) -> &str;
}

/// Client for an OpenAI-compatible `chat/completions` endpoint
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model_id: String,
}

impl ChatCompletionsClient {
    /// Create a new client with an explicit request timeout
    pub fn new(config: &AppConfig) -> Result<Self, ModelError> {
        let api_key = config.api_key.clone().ok_or_else(|| ModelError::ConfigError {
            message: "GEMINI_API_KEY is not configured".to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .build()?;

        Ok(Self {
            client,
            endpoint: chat_completions_url(&config.api_base_url),
            api_key,
            model_id: config.model_id.clone(),
        })
    }

    /// Extract the generated text from a chat-completion response body
    fn extract_content(json: &serde_json::Value) -> Result<String, ModelError> {
        json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ModelError::InvalidResponseError {
                message: "No completion choice in response".to_string(),
            })
    }
}

/// Join the base URL with the `chat/completions` path
fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait]
impl ChatModel for ChatCompletionsClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ModelError> {
        let body = serde_json::json!({
            "model": self.model_id,
            "messages": messages,
        });

        debug!("Sending completion request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let json: serde_json::Value =
                response
                    .json()
                    .await
                    .map_err(|e| ModelError::InvalidResponseError {
                        message: e.to_string(),
                    })?;

            Self::extract_content(&json)
        } else {
            let status_code = status.as_u16();
            let error_text = response.text().await.unwrap_or_default();

            Err(ModelError::ApiError {
                status: status_code,
                message: error_text,
            })
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
