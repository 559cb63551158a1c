//! OpenAI-compatible LLM provider implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::conversation::Message;
use crate::error::{CondenseError, Result};
use crate::llm::{ChatCompletion, LLMProvider, LLMRequest, ModelInfo, upstream_model};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat completions provider. Also works against compatible servers
/// (vLLM, LM Studio, llama.cpp) through a custom base URL.
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Model name (e.g., "gpt-4o-mini")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Create with a custom base URL (for Azure OpenAI or compatible APIs).
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables.
    ///
    /// Reads from:
    /// - `OPENAI_API_KEY` - API key (required)
    /// - `OPENAI_MODEL` - Model name (optional, defaults to "gpt-4o-mini")
    /// - `OPENAI_BASE_URL` - Custom base URL (optional)
    ///
    /// # Errors
    ///
    /// Returns an error if OPENAI_API_KEY is not set.
    pub fn from_env(model: Option<impl Into<String>>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            CondenseError::Configuration("OPENAI_API_KEY environment variable not set".to_string())
        })?;

        let model = model
            .map(|m| m.into())
            .or_else(|| std::env::var("OPENAI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::with_base_url(api_key, model, base_url))
    }

    /// Bound every request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = super::http_client(Some(timeout))?;
        Ok(self)
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Deserialize)]
struct OpenAIErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn chat_completion(&self, request: &LLMRequest) -> Result<ChatCompletion> {
        // Message content goes out as-is: the API accepts both strings and part lists
        let openai_request = OpenAIRequest {
            model: upstream_model(&request.model, "openai", &self.model),
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                CondenseError::Provider(format!("Failed to send request to OpenAI: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error) = serde_json::from_str::<OpenAIError>(&text) {
                return Err(CondenseError::Provider(format!(
                    "OpenAI API error ({}): {}",
                    error.error.error_type.unwrap_or_else(|| status.to_string()),
                    error.error.message
                )));
            }

            return Err(CondenseError::Provider(format!(
                "OpenAI API error ({}): {}",
                status, text
            )));
        }

        response.json::<ChatCompletion>().await.map_err(|e| {
            CondenseError::Provider(format!("Failed to parse OpenAI response: {}", e))
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "openai".to_string(),
            model_name: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ContentPart, Role};
    use serde_json::json;

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAIProvider::new("test-key", "gpt-4o");
        assert_eq!(provider.model(), "gpt-4o");
        assert_eq!(provider.base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn test_openai_provider_custom_base_url() {
        let provider = OpenAIProvider::with_base_url("test-key", "local", "http://localhost:8000/v1/");
        assert_eq!(provider.base_url(), "http://localhost:8000/v1");
    }

    #[test]
    fn test_request_body_keeps_parts() {
        let messages = vec![
            Message::system("Summarize."),
            Message::with_parts(Role::User, vec![ContentPart::text("hi")]),
        ];
        let body = OpenAIRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: None,
            max_tokens: Some(100),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "model": "gpt-4o",
                "messages": [
                    {"role": "system", "content": "Summarize."},
                    {"role": "user", "content": [{"type": "text", "text": "hi"}]}
                ],
                "max_tokens": 100
            })
        );
    }
}
