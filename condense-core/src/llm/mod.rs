use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::conversation::Message;
use crate::error::Result;

/// Request to an LLM provider
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Model identifier, optionally prefixed with `provider/`
    pub model: String,

    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Temperature for generation (0.0-2.0)
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    pub max_tokens: Option<usize>,
}

impl LLMRequest {
    /// Create a request for an existing conversation
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Create a one-shot request with system prompt
    pub fn with_system_prompt(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        let system_prompt: String = system_prompt.into();
        let user_prompt: String = user_prompt.into();
        Self::new(
            model,
            vec![Message::system(system_prompt), Message::user(user_prompt)],
        )
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 2.0));
        self
    }

    pub fn with_max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = Some(tokens);
        self
    }
}

/// Chat completion response in the `{choices: [{message: {content}}]}` shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Single-choice assistant completion
    pub fn from_text(content: impl Into<String>) -> Self {
        Self {
            choices: vec![Choice {
                message: Some(ChoiceMessage {
                    role: Some("assistant".to_string()),
                    content: Some(content.into()),
                }),
            }],
            usage: None,
        }
    }

    /// `choices[0].message.content`, if the response has one
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Trait for LLM provider implementations.
///
/// The compaction engine only ever asks for one thing: build a one-shot
/// request and complete it. Implementors handle the actual HTTP call.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Build a one-shot request from a model id, system instruction and input text.
    fn chat_request(&self, model: &str, system_prompt: &str, text: &str) -> LLMRequest {
        LLMRequest::with_system_prompt(model, system_prompt, text)
    }

    /// Execute a request.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider cannot be reached or answers with
    /// something that is not a chat completion.
    async fn chat_completion(&self, request: &LLMRequest) -> Result<ChatCompletion>;

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

/// Model information
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

/// Resolve the model a provider should send upstream.
///
/// Drops a leading `provider/` when it names this provider, and falls back to
/// the provider's own model when the request carries none.
pub(crate) fn upstream_model<'a>(requested: &'a str, provider: &str, fallback: &'a str) -> &'a str {
    let model = requested
        .strip_prefix(provider)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(requested);
    if model.is_empty() { fallback } else { model }
}

pub mod factory;
pub mod providers;

pub use factory::LLMProviderFactory;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_content() {
        let completion = ChatCompletion::from_text("summary");
        assert_eq!(completion.first_content(), Some("summary"));

        assert_eq!(ChatCompletion::default().first_content(), None);

        let no_message: ChatCompletion =
            serde_json::from_value(json!({"choices": [{"finish_reason": "stop"}]})).unwrap();
        assert_eq!(no_message.first_content(), None);

        let null_content: ChatCompletion =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(null_content.first_content(), None);
    }

    #[test]
    fn test_openai_shaped_response() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}}],
            "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
        }))
        .unwrap();
        assert_eq!(completion.first_content(), Some("ok"));
        assert_eq!(completion.usage.map(|u| u.total_tokens), Some(4));
    }

    #[test]
    fn test_request_builders() {
        let request = LLMRequest::with_system_prompt("ollama/qwen2.5:7b", "Summarize.", "user: hi\n\n")
            .with_temperature(5.0)
            .with_max_tokens(256);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], Message::system("Summarize."));
        assert_eq!(request.messages[1].text(), "user: hi\n\n");
        assert_eq!(request.temperature, Some(2.0));
        assert_eq!(request.max_tokens, Some(256));
    }

    #[test]
    fn test_upstream_model() {
        assert_eq!(upstream_model("ollama/qwen2.5:7b", "ollama", "x"), "qwen2.5:7b");
        assert_eq!(upstream_model("qwen2.5:7b", "ollama", "x"), "qwen2.5:7b");
        assert_eq!(upstream_model("meta/llama", "ollama", "x"), "meta/llama");
        assert_eq!(upstream_model("", "ollama", "fallback"), "fallback");
        assert_eq!(upstream_model("ollama/", "ollama", "fallback"), "fallback");
    }
}
