//! One-shot summarization through an LLM provider

use crate::error::{CondenseError, Result};
use crate::llm::LLMProvider;

/// Ask `provider` to summarize a rendered transcript.
///
/// Returns the trimmed `choices[0].message.content`. A provider error, a
/// response without that field, or a blank summary are all
/// [`CondenseError::Summarization`].
pub async fn generate_summary(
    provider: &dyn LLMProvider,
    model: &str,
    system_prompt: &str,
    transcript: &str,
) -> Result<String> {
    let request = provider.chat_request(model, system_prompt, transcript);

    tracing::debug!(model = %model, chars = transcript.len(), "Calling LLM for summary");

    let response = provider
        .chat_completion(&request)
        .await
        .map_err(|e| CondenseError::Summarization(e.to_string()))?;

    let Some(content) = response.first_content() else {
        return Err(CondenseError::Summarization(
            "unexpected response format: no choices[0].message.content".to_string(),
        ));
    };

    let summary = content.trim();
    if summary.is_empty() {
        return Err(CondenseError::Summarization(
            "model returned an empty summary".to_string(),
        ));
    }

    Ok(summary.to_string())
}
