//! Compaction configuration

use serde::{Deserialize, Serialize};

/// Which model summarizes, and how it is instructed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactionConfig {
    /// Provider name used as the model id prefix (empty for none)
    pub provider: String,

    /// Model name passed to the provider
    pub model: String,

    /// System instruction for the summarization call
    pub summary_prompt: String,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "qwen2.5:7b".to_string(),
            summary_prompt: "Summarize this conversation concisely.".to_string(),
        }
    }
}

impl CompactionConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set provider name
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Set model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set summarization instruction
    pub fn with_summary_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.summary_prompt = prompt.into();
        self
    }

    /// Model identifier handed to the provider: `provider/model`, or `model`
    /// alone when no provider is set.
    pub fn model_id(&self) -> String {
        if self.provider.is_empty() {
            self.model.clone()
        } else {
            format!("{}/{}", self.provider, self.model)
        }
    }
}
