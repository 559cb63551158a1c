//! Factory for creating LLM providers from configuration

use crate::config::{CondenseConfig, LLMProviderKind};
use crate::error::Result;
use crate::llm::LLMProvider;
use std::sync::Arc;

#[cfg(feature = "llm-ollama")]
use crate::llm::providers::ollama::OllamaProvider;

#[cfg(feature = "llm-openai")]
use crate::llm::providers::openai::OpenAIProvider;

/// Factory for creating LLM providers
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create the provider named by `compaction.provider`
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unknown, not compiled in, or cannot
    /// be created (e.g., missing API key)
    pub async fn create(config: &CondenseConfig) -> Result<Arc<dyn LLMProvider>> {
        let kind = LLMProviderKind::parse(&config.compaction.provider)?;
        let model = &config.compaction.model;
        let llm = &config.llm;

        match kind {
            #[cfg(feature = "llm-ollama")]
            LLMProviderKind::Ollama => {
                let mut provider = match &llm.base_url {
                    Some(url) => OllamaProvider::new(model.clone(), Some(url.clone())),
                    None => OllamaProvider::from_env(Some(model.clone()))?,
                };
                if let Some(timeout) = llm.request_timeout {
                    provider = provider.with_timeout(timeout)?;
                }

                tracing::debug!(model = %model, base_url = provider.base_url(), "Created Ollama provider");
                Ok(Arc::new(provider))
            }

            #[cfg(not(feature = "llm-ollama"))]
            LLMProviderKind::Ollama => Err(crate::error::CondenseError::Configuration(
                "Ollama provider requires 'llm-ollama' feature".to_string(),
            )),

            #[cfg(feature = "llm-openai")]
            LLMProviderKind::OpenAI => {
                let mut provider = match (&llm.api_key, &llm.base_url) {
                    (Some(key), Some(url)) => {
                        OpenAIProvider::with_base_url(key.clone(), model.clone(), url.clone())
                    }
                    (Some(key), None) => OpenAIProvider::new(key.clone(), model.clone()),
                    (None, _) => OpenAIProvider::from_env(Some(model.clone()))?,
                };
                if let Some(timeout) = llm.request_timeout {
                    provider = provider.with_timeout(timeout)?;
                }

                tracing::debug!(model = %model, base_url = provider.base_url(), "Created OpenAI provider");
                Ok(Arc::new(provider))
            }

            #[cfg(not(feature = "llm-openai"))]
            LLMProviderKind::OpenAI => Err(crate::error::CondenseError::Configuration(
                "OpenAI provider requires 'llm-openai' feature".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compaction::CompactionConfig;

    #[tokio::test]
    async fn test_unknown_provider() {
        let config = CondenseConfig {
            compaction: CompactionConfig::new().with_provider("carrier-pigeon"),
            ..Default::default()
        };
        assert!(LLMProviderFactory::create(&config).await.is_err());
    }

    #[cfg(feature = "llm-ollama")]
    #[tokio::test]
    async fn test_create_ollama() {
        let mut config = CondenseConfig::default();
        config.llm.base_url = Some("http://localhost:11434".to_string());
        let provider = LLMProviderFactory::create(&config).await.unwrap();
        let info = provider.model_info();
        assert_eq!(info.provider, "ollama");
        assert_eq!(info.model_name, "qwen2.5:7b");
    }

    #[cfg(feature = "llm-openai")]
    #[tokio::test]
    async fn test_create_openai_with_key() {
        let mut config = CondenseConfig {
            compaction: CompactionConfig::new().with_provider("openai").with_model("gpt-4o-mini"),
            ..Default::default()
        };
        config.llm.api_key = Some("sk-test".to_string());
        let provider = LLMProviderFactory::create(&config).await.unwrap();
        assert_eq!(provider.model_info().model_name, "gpt-4o-mini");
    }

    #[cfg(not(feature = "llm-ollama"))]
    #[tokio::test]
    async fn test_ollama_needs_feature() {
        assert!(LLMProviderFactory::create(&CondenseConfig::default()).await.is_err());
    }
}
