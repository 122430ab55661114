use domain::models::Match;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("unexpected search response: {0}")]
    MalformedSearchResponse(String),
}

/// Joins each match's `metadata.texto` with newlines, in the order returned.
///
/// Matches without text contribute an empty line so positions are kept.
pub fn assemble_context(search_response: &Value) -> Result<String, RagError> {
    let matches = search_response
        .get("matches")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            RagError::MalformedSearchResponse(format!("no `matches` array in {}", truncate(search_response)))
        })?;

    let texts = matches
        .iter()
        .map(|raw| {
            Match::from_value(raw)
                .map(|m| m.text())
                .ok_or_else(|| {
                    RagError::MalformedSearchResponse(format!("match is not an object: {}", truncate(raw)))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(texts.join("\n"))
}

fn truncate(value: &Value) -> String {
    const MAX: usize = 200;
    let text = value.to_string();
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text,
    }
}
