//! Configuration types for Condense

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::compaction::CompactionConfig;
use crate::error::{CondenseError, Result};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CondenseConfig {
    /// Summarization model and prompt
    pub compaction: CompactionConfig,

    /// Connection settings for the provider named in `compaction.provider`
    pub llm: LLMProviderConfig,
}

/// LLM provider connection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMProviderConfig {
    /// Base URL (for custom endpoints, e.g., a remote Ollama)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// API key (if needed, prefer env vars)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Whole-request timeout, e.g. "90s"
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<Duration>,
}

/// Provider backends known to the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LLMProviderKind {
    Ollama,
    OpenAI,
}

impl LLMProviderKind {
    /// Parse a provider name. An empty name means the default (Ollama).
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "" | "ollama" => Ok(LLMProviderKind::Ollama),
            "openai" => Ok(LLMProviderKind::OpenAI),
            other => Err(CondenseError::Configuration(format!(
                "Invalid LLM provider: {}",
                other
            ))),
        }
    }
}

impl CondenseConfig {
    /// Load configuration from files and environment variables.
    ///
    /// Loads in this order:
    /// 1. Default configuration
    /// 2. `condense.toml`, then `config.json` in the working directory
    /// 3. The file named by `CONDENSE_CONFIG_PATH`, if set
    /// 4. `CONDENSE_` environment variables (`CONDENSE_COMPACTION__MODEL=...`)
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is invalid.
    pub fn load() -> Result<Self> {
        use figment::{
            Figment,
            providers::{Env, Format, Json, Serialized, Toml},
        };

        let mut figment = Figment::from(Serialized::defaults(CondenseConfig::default()))
            .merge(Toml::file("condense.toml"))
            .merge(Json::file("config.json"));

        if let Ok(path) = std::env::var("CONDENSE_CONFIG_PATH") {
            figment = merge_file(figment, Path::new(&path));
        }

        let config: CondenseConfig = figment
            .merge(Env::prefixed("CONDENSE_").split("__"))
            .extract()
            .map_err(|e| {
                CondenseError::Configuration(format!("Failed to load configuration: {}", e))
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific TOML or JSON file on top of defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        use figment::{Figment, providers::Serialized};

        let path = path.as_ref();
        if !path.exists() {
            return Err(CondenseError::Configuration(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let figment = Figment::from(Serialized::defaults(CondenseConfig::default()));
        let config: CondenseConfig = merge_file(figment, path).extract().map_err(|e| {
            CondenseError::Configuration(format!("Failed to load configuration file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Copy with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.llm.api_key.is_some() {
            config.llm.api_key = Some("***".to_string());
        }
        config
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.compaction.model.trim().is_empty() {
            return Err(CondenseError::Configuration(
                "compaction.model must not be empty".to_string(),
            ));
        }
        if self.compaction.summary_prompt.trim().is_empty() {
            return Err(CondenseError::Configuration(
                "compaction.summary_prompt must not be empty".to_string(),
            ));
        }
        LLMProviderKind::parse(&self.compaction.provider)?;
        Ok(())
    }
}

fn merge_file(figment: figment::Figment, path: &Path) -> figment::Figment {
    use figment::providers::{Format, Json, Toml};

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => figment.merge(Json::file(path)),
        _ => figment.merge(Toml::file(path)),
    }
}
