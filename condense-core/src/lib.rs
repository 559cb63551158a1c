//! # Condense - Conversation Compaction for Chat Pipelines
//!
//! Condense is a request-filter middleware for multi-turn chat applications.
//! When a user sends `/compact`, the thread's history is summarized by a
//! language model and replaced with that summary; every later turn of the
//! thread is sent as the summary plus the latest message.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use condense_core::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = CondenseConfig::load()?;
//!     let provider = LLMProviderFactory::create(&config).await?;
//!     let engine = CompactionEngine::new(provider, BoundaryStore::new(), config.compaction);
//!
//!     let mut filters = FilterRegistry::new();
//!     filters.register(Arc::new(engine));
//!
//!     let mut request = ChatRequest::new(vec![
//!         Message::user("hi"),
//!         Message::assistant("hello"),
//!         Message::user("/compact"),
//!     ]);
//!     filters
//!         .apply(&mut request, &RequestContext::new().with_thread_id("t1"))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `llm-ollama`: Ollama provider (`/api/chat`)
//! - `llm-openai`: OpenAI-compatible provider (`/chat/completions`)

pub mod compaction;
pub mod config;
pub mod conversation;
pub mod error;
pub mod filters;
pub mod llm;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::compaction::{
        BoundaryStore, CompactionBoundary, CompactionConfig, CompactionEngine, CompactionReport,
        TokenEstimator, TurnOutcome,
    };
    pub use crate::config::{CondenseConfig, LLMProviderConfig, LLMProviderKind};
    pub use crate::conversation::{
        ChatRequest, Content, ContentPart, Message, Role, TextPart, render_transcript,
    };
    pub use crate::error::{CondenseError, Result};
    pub use crate::filters::{ChatRequestFilter, FilterRegistry, LoggingFilter, RequestContext};
    pub use crate::llm::{
        ChatCompletion, LLMProvider, LLMProviderFactory, LLMRequest, ModelInfo, TokenUsage,
    };
}
