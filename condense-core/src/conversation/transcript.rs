//! Transcript rendering for summarization prompts

use super::message::Message;

/// Render messages as `"<role>: <content>\n\n"` blocks, in order.
///
/// Part lists are flattened with single spaces between parts.
pub fn render_transcript(messages: &[Message]) -> String {
    let mut transcript = String::new();
    for message in messages {
        transcript.push_str(message.role.as_str());
        transcript.push_str(": ");
        transcript.push_str(&message.content.flatten());
        transcript.push_str("\n\n");
    }
    transcript
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::{ContentPart, Role};
    use serde_json::json;

    #[test]
    fn test_render_plain_messages() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        assert_eq!(render_transcript(&messages), "user: hi\n\nassistant: hello\n\n");
    }

    #[test]
    fn test_render_parts_and_other_roles() {
        let messages = vec![
            Message::with_parts(
                Role::User,
                vec![
                    ContentPart::text("what is"),
                    ContentPart::Other(json!({"type": "image_url", "image_url": {"url": "x"}})),
                    ContentPart::text("this?"),
                ],
            ),
            Message::new(Role::Other("critic".into()), "looks fine"),
        ];
        assert_eq!(
            render_transcript(&messages),
            "user: what is  this?\n\ncritic: looks fine\n\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_transcript(&[]), "");
    }
}
