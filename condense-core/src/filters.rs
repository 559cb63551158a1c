//! Chat request filters
//!
//! The host runs every outgoing chat request through a [`FilterRegistry`]
//! before it reaches the completion API. Filters may rewrite the request in
//! place; the compaction engine is one of them.
//!
//! # Example
//!
//! ```rust,ignore
//! use condense_core::filters::{FilterRegistry, LoggingFilter, RequestContext};
//!
//! let mut registry = FilterRegistry::new();
//! registry.register(Arc::new(LoggingFilter));
//! registry.register(Arc::new(engine));
//!
//! registry.apply(&mut request, &RequestContext::new().with_thread_id("t1")).await?;
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::compaction::{CompactionEngine, DEFAULT_THREAD_ID, TokenEstimator, TurnOutcome};
use crate::conversation::ChatRequest;
use crate::error::Result;

/// Per-request data the host passes alongside the request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Conversation thread the request belongs to
    pub thread_id: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    /// Thread id, or `"default"` when none was given
    pub fn thread_id(&self) -> &str {
        self.thread_id.as_deref().unwrap_or(DEFAULT_THREAD_ID)
    }
}

/// Trait for chat request filters
#[async_trait]
pub trait ChatRequestFilter: Send + Sync {
    /// Inspect and optionally rewrite a request before it is sent
    async fn on_chat_request(&self, request: &mut ChatRequest, context: &RequestContext)
    -> Result<()>;

    /// Filter name for logs
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Registry for managing filters, run in registration order
#[derive(Default)]
pub struct FilterRegistry {
    filters: Vec<Arc<dyn ChatRequestFilter>>,
}

impl FilterRegistry {
    /// Create a new filter registry
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Register a filter
    pub fn register(&mut self, filter: Arc<dyn ChatRequestFilter>) {
        tracing::debug!(filter = filter.name(), "Registered chat request filter");
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every filter on the request; stops at the first error
    pub async fn apply(&self, request: &mut ChatRequest, context: &RequestContext) -> Result<()> {
        for filter in &self.filters {
            filter.on_chat_request(request, context).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ChatRequestFilter for CompactionEngine {
    async fn on_chat_request(
        &self,
        request: &mut ChatRequest,
        context: &RequestContext,
    ) -> Result<()> {
        let outcome = self
            .process(&mut request.messages, Some(context.thread_id()))
            .await;
        if outcome != TurnOutcome::PassThrough {
            tracing::debug!(thread = %context.thread_id(), ?outcome, "Compaction filter applied");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "context_compaction"
    }
}

/// Logs the size of each request that passes through
pub struct LoggingFilter;

#[async_trait]
impl ChatRequestFilter for LoggingFilter {
    async fn on_chat_request(
        &self,
        request: &mut ChatRequest,
        context: &RequestContext,
    ) -> Result<()> {
        tracing::info!(
            thread = %context.thread_id(),
            messages = request.messages.len(),
            est_tokens = TokenEstimator::estimate(&request.messages),
            "Chat request"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "logging"
    }
}
