//! Message content normalization
//!
//! Hosts send message content either as a plain string or as an ordered list
//! of typed parts (`{"type": "text", "text": ...}`, `{"type": "image_url", ...}`).
//! Anything else is kept as raw JSON. Nothing in here fails: shapes we do not
//! recognize degrade to their string form.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Plain text body
    Text(String),
    /// Ordered sequence of content parts
    Parts(Vec<ContentPart>),
    /// Any other JSON value the host put in `content`
    Other(Value),
}

/// One unit of a structured message body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    /// A part object carrying a string `text` field
    Text(TextPart),
    /// Image parts, bare strings, and every other shape
    Other(Value),
}

/// A text-bearing part. Fields other than `text` (usually `type`) are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPart {
    pub text: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TextPart {
    /// Create a `{"type": "text", "text": ...}` part
    pub fn new(text: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("type".to_string(), Value::String("text".to_string()));
        Self {
            text: text.into(),
            fields,
        }
    }
}

/// Coerce a raw JSON value to text. Strings are used unquoted.
pub(crate) fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ContentPart {
    /// Plain text part
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(TextPart::new(text))
    }

    /// Text contributed by this part when flattening.
    ///
    /// Objects without a `text` field (images, audio) contribute nothing;
    /// scalar parts contribute their string form.
    pub fn flat_text(&self) -> String {
        match self {
            ContentPart::Text(part) => part.text.clone(),
            ContentPart::Other(Value::Object(_)) => String::new(),
            ContentPart::Other(value) => string_form(value),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for Content {
    fn from(parts: Vec<ContentPart>) -> Self {
        Content::Parts(parts)
    }
}

impl Content {
    /// The text a command check should look at.
    ///
    /// For part lists this is the first part only; an empty list yields "".
    pub fn extract_text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Parts(parts) => parts.first().map(ContentPart::flat_text).unwrap_or_default(),
            Content::Other(value) => string_form(value),
        }
    }

    /// All parts' text joined with single spaces.
    pub fn flatten(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Parts(parts) => parts
                .iter()
                .map(ContentPart::flat_text)
                .collect::<Vec<_>>()
                .join(" "),
            Content::Other(value) => string_form(value),
        }
    }

    /// Canonical serialized form used for size accounting.
    pub fn serialized(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Parts(parts) => serde_json::to_string(parts).unwrap_or_default(),
            Content::Other(value) => string_form(value),
        }
    }

    /// Replace the text portion of the content.
    ///
    /// When the first part carries text only that field changes and every
    /// other part survives. Otherwise the whole content becomes plain text.
    pub fn rewrite_text(&mut self, text: impl Into<String>) {
        if let Content::Parts(parts) = self
            && let Some(ContentPart::Text(first)) = parts.first_mut()
        {
            first.text = text.into();
            return;
        }
        *self = Content::Text(text.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Content {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserialize_shapes() {
        assert_eq!(parse(json!("hello")), Content::Text("hello".into()));
        assert!(matches!(parse(json!([])), Content::Parts(ref p) if p.is_empty()));
        assert!(matches!(parse(json!(42)), Content::Other(_)));
        assert!(matches!(parse(json!({"a": 1})), Content::Other(_)));

        let content = parse(json!([
            {"type": "text", "text": "look"},
            {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAA"}},
            "loose"
        ]));
        let Content::Parts(parts) = content else {
            panic!("expected parts");
        };
        assert!(matches!(parts[0], ContentPart::Text(_)));
        assert!(matches!(parts[1], ContentPart::Other(Value::Object(_))));
        assert!(matches!(parts[2], ContentPart::Other(Value::String(_))));
    }

    #[test]
    fn test_non_string_text_field_is_not_a_text_part() {
        let content = parse(json!([{"type": "text", "text": 7}]));
        let Content::Parts(parts) = content else {
            panic!("expected parts");
        };
        assert!(matches!(parts[0], ContentPart::Other(_)));
    }

    #[test]
    fn test_extract_text() {
        assert_eq!(Content::from("/compact now").extract_text(), "/compact now");
        assert_eq!(Content::Parts(vec![]).extract_text(), "");
        assert_eq!(
            parse(json!([{"type": "text", "text": "first"}, {"type": "text", "text": "second"}]))
                .extract_text(),
            "first"
        );
        assert_eq!(parse(json!(["bare", "x"])).extract_text(), "bare");
        assert_eq!(parse(json!([3, 4])).extract_text(), "3");
        assert_eq!(parse(json!([{"type": "image_url"}])).extract_text(), "");
        assert_eq!(parse(json!(12.5)).extract_text(), "12.5");
        assert_eq!(parse(json!(null)).extract_text(), "null");
        assert_eq!(parse(json!({"k": "v"})).extract_text(), r#"{"k":"v"}"#);
    }

    #[test]
    fn test_flatten_joins_parts() {
        let content = parse(json!([
            {"type": "text", "text": "see"},
            {"type": "image_url", "image_url": {"url": "x"}},
            {"type": "text", "text": "this"},
            5
        ]));
        assert_eq!(content.flatten(), "see  this 5");
        assert_eq!(Content::from("plain").flatten(), "plain");
    }

    #[test]
    fn test_rewrite_preserves_other_parts() {
        let mut content = parse(json!([
            {"type": "text", "text": "/compact", "cache_control": {"type": "ephemeral"}},
            {"type": "image_url", "image_url": {"url": "x"}}
        ]));
        let before = content.clone();
        content.rewrite_text("replaced");

        let (Content::Parts(after), Content::Parts(orig)) = (&content, &before) else {
            panic!("expected parts");
        };
        assert_eq!(after.len(), 2);
        assert_eq!(after[1], orig[1]);
        let ContentPart::Text(first) = &after[0] else {
            panic!("expected text part");
        };
        assert_eq!(first.text, "replaced");
        assert_eq!(first.fields.get("cache_control"), Some(&json!({"type": "ephemeral"})));
        assert_eq!(first.fields.get("type"), Some(&json!("text")));
    }

    #[test]
    fn test_rewrite_replaces_wholesale_otherwise() {
        let mut text = Content::from("old");
        text.rewrite_text("new");
        assert_eq!(text, Content::from("new"));

        let mut empty = Content::Parts(vec![]);
        empty.rewrite_text("new");
        assert_eq!(empty, Content::from("new"));

        let mut image_first = parse(json!([
            {"type": "image_url", "image_url": {"url": "x"}},
            {"type": "text", "text": "caption"}
        ]));
        image_first.rewrite_text("new");
        assert_eq!(image_first, Content::from("new"));

        let mut other = parse(json!(null));
        other.rewrite_text("new");
        assert_eq!(other, Content::from("new"));
    }

    #[test]
    fn test_round_trip_keeps_part_fields() {
        let raw = json!([{"type": "text", "text": "hi"}]);
        let content = parse(raw.clone());
        assert_eq!(serde_json::to_value(&content).unwrap(), raw);
    }
}
