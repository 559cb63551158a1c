//! Compaction Engine
//!
//! Decides, for each incoming chat turn, whether to compact the history into
//! a fresh summary, reapply the thread's stored summary, or leave the turn
//! alone, and rewrites the message list accordingly.

use std::sync::Arc;

use crate::conversation::{Message, render_transcript};
use crate::llm::LLMProvider;

use super::boundary::{BoundaryStore, CompactionBoundary};
use super::config::CompactionConfig;
use super::estimator::TokenEstimator;
use super::summarizer::generate_summary;
use super::{
    COMPACT_COMMAND, CONTINUE_PROMPT, DEFAULT_THREAD_ID, EMPTY_HISTORY_MESSAGE, LOG_TARGET,
    SUMMARY_FAILED_MESSAGE,
};

/// Accounting for a successful fresh compaction
#[derive(Debug, Clone, PartialEq)]
pub struct CompactionReport {
    /// Estimated tokens of the compacted messages
    pub pre_tokens: usize,

    /// Estimated tokens of the rewritten conversation
    pub post_tokens: usize,

    /// Number of messages folded into the summary
    pub messages_compacted: usize,

    /// Length of the summary in characters
    pub summary_chars: usize,

    /// `(pre - post) / pre * 100`, 0 when nothing was measured
    pub reduction_percent: f64,
}

/// What the engine did with a turn
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The conversation was left untouched
    PassThrough,

    /// `/compact` with nothing before it; the command text was replaced
    EmptyHistory,

    /// A new boundary was stored and the conversation rewritten
    Compacted(CompactionReport),

    /// Summarization failed; prior state kept, user told via the message text
    SummaryFailed { reason: String },

    /// The stored boundary was reapplied
    Reapplied { original_len: usize },
}

/// Whether a message text is the compaction command
pub fn is_compact_command(text: &str) -> bool {
    text.trim().starts_with(COMPACT_COMMAND)
}

/// Per-thread compaction state machine
pub struct CompactionEngine {
    /// LLM provider used for summaries
    provider: Arc<dyn LLMProvider>,

    /// Boundaries by thread
    store: BoundaryStore,

    /// Model and prompt configuration
    config: CompactionConfig,
}

impl CompactionEngine {
    /// Create an engine over an existing store
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        store: BoundaryStore,
        config: CompactionConfig,
    ) -> Self {
        Self {
            provider,
            store,
            config,
        }
    }

    /// Handle to the engine's boundary store
    pub fn store(&self) -> &BoundaryStore {
        &self.store
    }

    /// Summarization settings in use
    pub fn config(&self) -> &CompactionConfig {
        &self.config
    }

    /// Process one chat turn, rewriting `messages` in place.
    ///
    /// `thread_id` defaults to `"default"` when absent. This never fails:
    /// every failure path leaves a user-visible message in the conversation
    /// and the thread's previous boundary intact.
    pub async fn process(&self, messages: &mut Vec<Message>, thread_id: Option<&str>) -> TurnOutcome {
        let thread_id = thread_id.unwrap_or(DEFAULT_THREAD_ID);

        let Some(last) = messages.last() else {
            return TurnOutcome::PassThrough;
        };

        if !last.is_user() {
            return TurnOutcome::PassThrough;
        }

        if is_compact_command(&last.text()) {
            return self.compact(messages, thread_id).await;
        }

        match self.store.get(thread_id).await {
            Some(boundary) => reapply(messages, &boundary, thread_id),
            None => TurnOutcome::PassThrough,
        }
    }

    /// Fresh compaction of everything before the trailing command message.
    async fn compact(&self, messages: &mut Vec<Message>, thread_id: &str) -> TurnOutcome {
        tracing::info!(target: LOG_TARGET, thread = %thread_id, "/compact command");

        let split = messages.len().saturating_sub(1);
        let to_compact = &messages[..split];

        if to_compact.is_empty() {
            if let Some(last) = messages.last_mut() {
                last.rewrite_text(EMPTY_HISTORY_MESSAGE);
            }
            return TurnOutcome::EmptyHistory;
        }

        tracing::info!(
            target: LOG_TARGET,
            thread = %thread_id,
            messages = to_compact.len(),
            "Compacting messages"
        );

        let pre_tokens = TokenEstimator::estimate(to_compact);
        let transcript = render_transcript(to_compact);
        let message_count = to_compact.len();
        let model = self.config.model_id();

        // Nothing is touched until the summary is in hand
        let summary = match generate_summary(
            self.provider.as_ref(),
            &model,
            &self.config.summary_prompt,
            &transcript,
        )
        .await
        {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    thread = %thread_id,
                    model = %model,
                    error = %e,
                    "Failed to generate summary"
                );
                messages.drain(..split);
                if let Some(last) = messages.last_mut() {
                    last.rewrite_text(SUMMARY_FAILED_MESSAGE);
                }
                return TurnOutcome::SummaryFailed {
                    reason: e.to_string(),
                };
            }
        };

        tracing::info!(
            target: LOG_TARGET,
            thread = %thread_id,
            chars = summary.chars().count(),
            "Summary generated"
        );

        let boundary = CompactionBoundary::new(summary, pre_tokens, message_count);
        let system = boundary.system_message();
        let summary_chars = boundary.summary.chars().count();
        self.store.put(thread_id, boundary).await;

        messages.drain(..split);
        if let Some(last) = messages.last_mut() {
            last.rewrite_text(CONTINUE_PROMPT);
        }
        messages.insert(0, system);

        let post_tokens = TokenEstimator::estimate(messages);
        let reduction_percent = TokenEstimator::reduction_percent(pre_tokens, post_tokens);

        tracing::info!(
            target: LOG_TARGET,
            thread = %thread_id,
            pre_tokens,
            post_tokens,
            "Reduction: ~{:.0}%",
            reduction_percent
        );

        TurnOutcome::Compacted(CompactionReport {
            pre_tokens,
            post_tokens,
            messages_compacted: message_count,
            summary_chars,
            reduction_percent,
        })
    }
}

/// Rebuild the conversation as the stored summary plus the latest message.
fn reapply(messages: &mut Vec<Message>, boundary: &CompactionBoundary, thread_id: &str) -> TurnOutcome {
    let original_len = messages.len();

    messages.drain(..original_len.saturating_sub(1));
    messages.insert(0, boundary.system_message());

    tracing::debug!(
        target: LOG_TARGET,
        thread = %thread_id,
        before = original_len,
        after = messages.len(),
        "Applied stored compaction"
    );

    TurnOutcome::Reapplied { original_len }
}
