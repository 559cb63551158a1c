//! Ollama LLM provider implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{CondenseError, Result};
use crate::llm::{
    ChatCompletion, LLMProvider, LLMRequest, ModelInfo, TokenUsage, upstream_model,
};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen2.5:7b";

/// Ollama LLM provider (local, free, runs on your machine).
pub struct OllamaProvider {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider.
    ///
    /// # Arguments
    ///
    /// * `model` - Model name (e.g., "qwen2.5:7b")
    /// * `base_url` - Base URL for Ollama API (defaults to "http://localhost:11434")
    pub fn new(model: impl Into<String>, base_url: Option<impl Into<String>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            base_url: base_url
                .map(|u| u.into())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    /// Create from environment variables.
    ///
    /// Reads from:
    /// - `OLLAMA_MODEL` - Model name (optional, defaults to "qwen2.5:7b")
    /// - `OLLAMA_BASE_URL` - Base URL (optional, defaults to "http://localhost:11434")
    ///
    /// # Arguments
    ///
    /// * `model` - Model name (overrides OLLAMA_MODEL if provided)
    pub fn from_env(model: Option<impl Into<String>>) -> Result<Self> {
        let model = model
            .map(|m| m.into())
            .or_else(|| std::env::var("OLLAMA_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url =
            std::env::var("OLLAMA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(model, Some(base_url)))
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
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: Option<OllamaOptions>,
}

#[derive(Serialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: Option<f32>,
    num_predict: Option<usize>,
}

#[derive(Deserialize)]
struct OllamaResponse {
    message: OllamaMessageResponse,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}

#[derive(Deserialize)]
struct OllamaMessageResponse {
    #[serde(default)]
    content: String,
}

impl From<OllamaResponse> for ChatCompletion {
    fn from(response: OllamaResponse) -> Self {
        // Only the answer channel counts; a reasoning trace in `thinking` is dropped
        let content = response.message.content;

        let usage = match (response.prompt_eval_count, response.eval_count) {
            (Some(prompt_tokens), Some(completion_tokens)) => Some(TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
            _ => None,
        };

        let mut completion = ChatCompletion::from_text(content);
        completion.usage = usage;
        completion
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    async fn chat_completion(&self, request: &LLMRequest) -> Result<ChatCompletion> {
        // Ollama takes plain-string content; part lists are flattened
        let ollama_messages: Vec<OllamaMessage> = request
            .messages
            .iter()
            .map(|m| OllamaMessage {
                role: m.role.to_string(),
                content: m.content.flatten(),
            })
            .collect();

        let ollama_request = OllamaRequest {
            model: upstream_model(&request.model, "ollama", &self.model).to_string(),
            messages: ollama_messages,
            stream: false,
            options: Some(OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            }),
        };

        let url = format!("{}/api/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                CondenseError::Provider(format!(
                    "Failed to send request to Ollama: {}. Make sure Ollama is running.",
                    e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CondenseError::Provider(format!(
                "Ollama API error ({}): {}",
                status, text
            )));
        }

        let response_text = response.text().await.map_err(|e| {
            CondenseError::Provider(format!("Failed to read Ollama response: {}", e))
        })?;

        let ollama_response: OllamaResponse = serde_json::from_str(&response_text).map_err(|e| {
            CondenseError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(ollama_response.into())
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "ollama".to_string(),
            model_name: self.model.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("qwen2.5:7b", None::<String>);
        assert_eq!(provider.model(), "qwen2.5:7b");
        assert_eq!(provider.base_url(), "http://localhost:11434");

        let provider = OllamaProvider::new("llama3", Some("http://gpu-box:11434"));
        assert_eq!(provider.base_url(), "http://gpu-box:11434");
    }

    #[test]
    fn test_with_timeout() {
        let provider = OllamaProvider::new("qwen2.5:7b", None::<String>)
            .with_timeout(Duration::from_secs(30))
            .unwrap();
        assert_eq!(provider.model_info().provider, "ollama");
    }

    #[test]
    fn test_response_conversion() {
        let response: OllamaResponse = serde_json::from_str(
            r#"{"model":"qwen2.5:7b","message":{"role":"assistant","content":"The user said hi."},
                "done":true,"prompt_eval_count":20,"eval_count":5}"#,
        )
        .unwrap();
        let completion = ChatCompletion::from(response);
        assert_eq!(completion.first_content(), Some("The user said hi."));
        assert_eq!(completion.usage.map(|u| u.total_tokens), Some(25));
    }

    struct Replay(ChatCompletion);

    #[async_trait]
    impl LLMProvider for Replay {
        async fn chat_completion(&self, _request: &LLMRequest) -> Result<ChatCompletion> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_thinking_only_response_is_not_a_summary() {
        let response: OllamaResponse = serde_json::from_str(
            r#"{"message":{"role":"assistant","content":"",
                "thinking":"Okay, the user wants a summary. Let me think..."}}"#,
        )
        .unwrap();
        let completion = ChatCompletion::from(response);
        assert_eq!(completion.first_content(), Some(""));
        assert!(completion.usage.is_none());

        let result = crate::compaction::generate_summary(
            &Replay(completion),
            "ollama/qwen2.5:7b",
            "Summarize this conversation concisely.",
            "user: hi\n\n",
        )
        .await;
        assert!(matches!(result, Err(CondenseError::Summarization(_))));
    }
}
