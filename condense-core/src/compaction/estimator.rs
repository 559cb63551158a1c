//! Token estimation for reduction reporting.

use crate::conversation::Message;

/// Estimates token count for messages.
///
/// Uses ~4 characters per token over the serialized content. It is a proxy
/// for reporting only and does not match any real tokenizer.
pub struct TokenEstimator;

impl TokenEstimator {
    /// Characters per token estimate.
    const CHARS_PER_TOKEN: usize = 4;

    /// Character count of one message's serialized content.
    #[must_use]
    pub fn content_chars(message: &Message) -> usize {
        message.content.serialized().chars().count()
    }

    /// Estimate total tokens for a set of messages.
    #[must_use]
    pub fn estimate(messages: &[Message]) -> usize {
        let chars: usize = messages.iter().map(Self::content_chars).sum();
        chars / Self::CHARS_PER_TOKEN
    }

    /// Percentage saved going from `pre` to `post` tokens; 0 when `pre` is 0.
    #[must_use]
    pub fn reduction_percent(pre: usize, post: usize) -> f64 {
        if pre == 0 {
            return 0.0;
        }
        (pre as f64 - post as f64) / pre as f64 * 100.0
    }
}
