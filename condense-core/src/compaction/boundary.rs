//! Per-thread compaction boundaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::conversation::Message;

use super::SUMMARY_HEADER;

/// Result of the latest successful compaction for one thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactionBoundary {
    /// Summary text returned by the model
    pub summary: String,

    /// Estimated tokens of the messages that were compacted
    pub pre_tokens: usize,

    /// Number of messages folded into the summary
    pub message_count: usize,

    /// When the boundary was created
    pub compacted_at: DateTime<Utc>,
}

impl CompactionBoundary {
    pub fn new(summary: impl Into<String>, pre_tokens: usize, message_count: usize) -> Self {
        Self {
            summary: summary.into(),
            pre_tokens,
            message_count,
            compacted_at: Utc::now(),
        }
    }

    /// The system message that stands in for the compacted history
    pub fn system_message(&self) -> Message {
        Message::system(format!("{}\n\n{}", SUMMARY_HEADER, self.summary))
    }
}

/// In-memory map from thread id to its latest boundary.
///
/// Cloning yields another handle onto the same map. Entries live as long as
/// the store and are only ever replaced, never removed.
#[derive(Debug, Clone, Default)]
pub struct BoundaryStore {
    boundaries: Arc<RwLock<HashMap<String, CompactionBoundary>>>,
}

impl BoundaryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest boundary for a thread
    pub async fn get(&self, thread_id: &str) -> Option<CompactionBoundary> {
        self.boundaries.read().await.get(thread_id).cloned()
    }

    /// Store a boundary, returning the one it replaced
    pub async fn put(
        &self,
        thread_id: impl Into<String>,
        boundary: CompactionBoundary,
    ) -> Option<CompactionBoundary> {
        self.boundaries
            .write()
            .await
            .insert(thread_id.into(), boundary)
    }

    pub async fn contains(&self, thread_id: &str) -> bool {
        self.boundaries.read().await.contains_key(thread_id)
    }

    /// Number of threads with a boundary
    pub async fn len(&self) -> usize {
        self.boundaries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.boundaries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;

    #[test]
    fn test_system_message_framing() {
        let boundary = CompactionBoundary::new("User greeted the assistant.", 1, 2);
        let message = boundary.system_message();
        assert_eq!(message.role, Role::System);
        assert_eq!(
            message.text(),
            "[Context: Previous conversation summary]\n\nUser greeted the assistant."
        );
    }

    #[test]
    fn test_boundary_serializes_camel_case() {
        let boundary = CompactionBoundary::new("s", 10, 3);
        let value = serde_json::to_value(&boundary).unwrap();
        assert_eq!(value["preTokens"], 10);
        assert_eq!(value["messageCount"], 3);
    }

    #[tokio::test]
    async fn test_put_replaces() {
        let store = BoundaryStore::new();
        assert!(store.is_empty().await);
        assert!(store.get("t1").await.is_none());

        assert!(store.put("t1", CompactionBoundary::new("first", 10, 2)).await.is_none());
        let replaced = store.put("t1", CompactionBoundary::new("second", 20, 4)).await;
        assert_eq!(replaced.map(|b| b.summary), Some("first".to_string()));

        assert_eq!(store.get("t1").await.unwrap().summary, "second");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_threads_are_independent() {
        let store = BoundaryStore::new();
        let handle = store.clone();

        let a = {
            let store = store.clone();
            tokio::spawn(async move { store.put("a", CompactionBoundary::new("A", 1, 1)).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { store.put("b", CompactionBoundary::new("B", 2, 2)).await })
        };
        a.await.unwrap();
        b.await.unwrap();

        assert_eq!(handle.get("a").await.unwrap().summary, "A");
        assert_eq!(handle.get("b").await.unwrap().summary, "B");
        assert!(handle.contains("a").await);
        assert!(!handle.contains("c").await);
        assert_eq!(handle.len().await, 2);
    }
}
