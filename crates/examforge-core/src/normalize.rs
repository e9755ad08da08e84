//! Response normalizer: raw model text → loosely-typed question batch.
//!
//! Model responses arrive wrapped in markdown fences, preceded or followed
//! by prose, or occasionally truncated. This module strips that wrapper
//! noise and does the structural parse; everything after it works on
//! `serde_json::Value`s.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ExtractError;
use crate::model::InvalidQuestion;

/// Maximum characters of raw text echoed back in a `MalformedResponse`.
pub const RESPONSE_PREVIEW_LEN: usize = 200;

// Anchored: only a fence that opens the document (with an optional language
// tag) or closes it is stripped. Fences mid-document are content.
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n").unwrap());
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n```[ \t]*$").unwrap());

/// The parsed-but-unvalidated output of the normalizer.
#[derive(Debug, Clone, Default)]
pub struct RawBatch {
    /// Entries of the `questions` array, still untyped.
    pub questions: Vec<Value>,
    /// Questions the model itself reported as undeterminable.
    pub invalid_questions: Vec<InvalidQuestion>,
}

/// Normalize a raw model response into a [`RawBatch`].
///
/// Strips an anchored leading/trailing code fence, falls back to the span
/// between the first `{` and the last `}` when the fence-stripped text does
/// not parse, and requires a `questions` array in the result.
pub fn normalize_response(raw: &str) -> Result<RawBatch, ExtractError> {
    let trimmed = raw.trim();

    let stripped = strip_fences(trimmed);

    let object = match serde_json::from_str::<Value>(stripped) {
        Ok(v) => v,
        Err(_) => brace_span(stripped)
            .and_then(|span| serde_json::from_str::<Value>(span).ok())
            .ok_or_else(|| ExtractError::MalformedResponse {
                preview: truncate_preview(trimmed),
            })?,
    };

    let questions = match object.get("questions") {
        Some(Value::Array(items)) => items.clone(),
        _ => return Err(ExtractError::MissingQuestionsField),
    };

    let invalid_questions = object
        .get("invalidQuestions")
        .cloned()
        .and_then(|v| serde_json::from_value::<Vec<InvalidQuestion>>(v).ok())
        .unwrap_or_default();

    Ok(RawBatch {
        questions,
        invalid_questions,
    })
}

/// Strip one anchored leading fence marker (plus optional language tag) and
/// one anchored trailing fence marker.
fn strip_fences(text: &str) -> &str {
    let mut out = text;
    if let Some(m) = LEADING_FENCE.find(out) {
        out = &out[m.end()..];
    }
    if let Some(m) = TRAILING_FENCE.find(out) {
        out = &out[..m.start()];
    }
    out.trim()
}

/// The span from the first `{` to the last `}`, inclusive.
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn truncate_preview(text: &str) -> String {
    if text.chars().count() <= RESPONSE_PREVIEW_LEN {
        text.to_string()
    } else {
        let cut: String = text.chars().take(RESPONSE_PREVIEW_LEN).collect();
        format!("{cut}...")
    }
}
