//! Conversation messages
//!
//! Host-shaped chat messages, content normalization, and transcript rendering.
//!
//! # Example
//!
//! ```rust
//! use condense_core::conversation::{render_transcript, Message};
//!
//! let messages = vec![Message::user("hi"), Message::assistant("hello")];
//! assert_eq!(render_transcript(&messages), "user: hi\n\nassistant: hello\n\n");
//! ```

mod content;
mod message;
mod transcript;

pub use content::{Content, ContentPart, TextPart};
pub use message::{ChatRequest, Message, Role};
pub use transcript::render_transcript;
