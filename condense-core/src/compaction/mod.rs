//! Context Compaction
//!
//! Replaces a thread's message history with a model-written summary when the
//! user sends `/compact`, and keeps presenting that summary in place of the
//! history on every later turn of the thread.
//!
//! # Behaviour
//!
//! - `/compact` with earlier messages: summarize them, store a
//!   [`CompactionBoundary`] for the thread, and send
//!   `[system(summary), user(continue prompt)]` downstream.
//! - `/compact` alone: answer with a fixed notice, no model call.
//! - Any other user turn on a compacted thread: `[system(summary), latest message]`.
//! - Everything else passes through untouched.
//!
//! # Example
//!
//! ```rust,ignore
//! use condense_core::compaction::{BoundaryStore, CompactionConfig, CompactionEngine};
//!
//! let engine = CompactionEngine::new(provider, BoundaryStore::new(), CompactionConfig::default());
//! let outcome = engine.process(&mut request.messages, Some("thread-42")).await;
//! ```

mod boundary;
mod config;
mod engine;
mod estimator;
mod summarizer;

pub use boundary::{BoundaryStore, CompactionBoundary};
pub use config::CompactionConfig;
pub use engine::{CompactionEngine, CompactionReport, TurnOutcome, is_compact_command};
pub use estimator::TokenEstimator;
pub use summarizer::generate_summary;

/// Command prefix that triggers a fresh compaction.
pub const COMPACT_COMMAND: &str = "/compact";

/// Thread id used when the host supplies none.
pub const DEFAULT_THREAD_ID: &str = "default";

/// First line of the system message carrying a summary.
pub const SUMMARY_HEADER: &str = "[Context: Previous conversation summary]";

/// Replaces the `/compact` text after a successful compaction.
pub const CONTINUE_PROMPT: &str = "Continue our conversation. What would you like to discuss next?";

/// Replaces the `/compact` text when there is nothing to compact.
pub const EMPTY_HISTORY_MESSAGE: &str = "No conversation history to compact.";

/// Replaces the `/compact` text when summarization fails.
pub const SUMMARY_FAILED_MESSAGE: &str = "Failed to generate summary.";

/// `tracing` target for engine events, e.g. `RUST_LOG=condense::compaction=debug`.
pub const LOG_TARGET: &str = "condense::compaction";
