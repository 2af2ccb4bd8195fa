//! Parsing of Content Generator responses.
//!
//! The generator replies with `{"response": ...}` where the payload is
//! either an already-structured object or a string containing JSON,
//! frequently wrapped in Markdown code fences. Some deployments skip the
//! envelope and return the object directly; both shapes are accepted.

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::models::StudyContent;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("generator response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("generator response is neither an object nor a string")]
    UnexpectedShape,
}

/// Strip Markdown code-fence delimiters (``` and ```json) from a raw
/// generator string and trim surrounding whitespace.
fn strip_code_fences(raw: &str) -> String {
    let fence = Regex::new(r"```(?:json)?").unwrap();
    fence.replace_all(raw, "").trim().to_string()
}

/// Parse a raw generator response into [`StudyContent`], attaching the
/// original input text onto the result so it round-trips through saved
/// sessions.
pub fn parse_generator_response(raw: &Value, input: &str) -> Result<StudyContent, ParseError> {
    // Unwrap the envelope when present.
    let payload = match raw.get("response") {
        Some(inner) => inner,
        None => raw,
    };

    let mut content: StudyContent = match payload {
        Value::Object(_) => serde_json::from_value(payload.clone())?,
        Value::String(s) => serde_json::from_str(&strip_code_fences(s))?,
        _ => return Err(ParseError::UnexpectedShape),
    };

    for (i, q) in content.quiz.iter().enumerate() {
        if !q.options.iter().any(|o| o == &q.answer) {
            log::warn!(
                "quiz question {} has an answer not present in its options: {:?}",
                i + 1,
                q.answer
            );
        }
    }

    content.input_text = input.to_string();
    Ok(content)
}
