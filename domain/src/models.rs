use serde_json::{Map, Value};
use shared::utils::non_empty;

/// A caller-supplied question. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// Returns `None` for an absent or empty question.
    pub fn parse(raw: Option<String>) -> Option<Self> {
        non_empty(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything handed to the answer generator for one question.
#[derive(Debug, Clone)]
pub struct RagQuery {
    pub question: Question,
    pub context: String,
}

/// One search hit, borrowed from the raw response.
///
/// Only `metadata.texto` is read; id, score and any other fields are opaque.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a>(&'a Map<String, Value>);

impl<'a> Match<'a> {
    /// `None` when the hit is not a JSON object.
    pub fn from_value(raw: &'a Value) -> Option<Self> {
        raw.as_object().map(Self)
    }

    /// The chunk text stored with this match.
    ///
    /// Missing metadata, non-object metadata and falsy values
    /// (`null`, `false`, `0`, `""`) all give `""`.
    pub fn text(&self) -> String {
        match self.0.get("metadata").and_then(|m| m.get("texto")) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}
