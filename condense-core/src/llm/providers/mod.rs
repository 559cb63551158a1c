//! LLM provider implementations

#[cfg(feature = "llm-ollama")]
pub mod ollama;

#[cfg(feature = "llm-ollama")]
pub use ollama::OllamaProvider;

#[cfg(feature = "llm-openai")]
pub mod openai;

#[cfg(feature = "llm-openai")]
pub use openai::OpenAIProvider;

/// HTTP client shared by the providers, with an optional whole-request timeout.
#[cfg(any(feature = "llm-ollama", feature = "llm-openai"))]
pub(crate) fn http_client(
    timeout: Option<std::time::Duration>,
) -> crate::error::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| {
        crate::error::CondenseError::Configuration(format!("Failed to build HTTP client: {}", e))
    })
}
