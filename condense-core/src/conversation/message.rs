//! Chat messages and requests as the host hands them to us

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::content::{Content, ContentPart};

/// Message role in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    /// Any role string this crate has no special handling for
    #[serde(untagged)]
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
            Role::Other(role) => role,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,

    #[serde(default)]
    pub content: Content,

    /// Host fields we pass through untouched (`name`, `tool_call_id`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Create a message with the given role and content
    pub fn new(role: Role, content: impl Into<Content>) -> Self {
        Self {
            role,
            content: content.into(),
            extra: Map::new(),
        }
    }

    pub fn system(content: impl Into<Content>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<Content>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<Content>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a message from structured parts
    pub fn with_parts(role: Role, parts: Vec<ContentPart>) -> Self {
        Self::new(role, Content::Parts(parts))
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Text of the message as seen by command detection
    pub fn text(&self) -> String {
        self.content.extract_text()
    }

    /// Replace the text portion of the message content
    pub fn rewrite_text(&mut self, text: impl Into<String>) {
        self.content.rewrite_text(text);
    }
}

/// A chat completion request flowing through the host's filter pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default)]
    pub messages: Vec<Message>,

    /// Remaining request fields (temperature, tools, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
