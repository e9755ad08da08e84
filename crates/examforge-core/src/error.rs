//! Batch-level extraction error types.
//!
//! These cover the only two fatal failures in the pipeline: unparseable
//! model output and a parsed object with no `questions` array. Per-question
//! problems are accumulated as strings by the validator and never abort the
//! batch; grading has no error type at all.

use thiserror::Error;

/// Fatal errors while turning a raw model response into a question batch.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The response could not be parsed as a JSON object, even after fence
    /// stripping and brace-span recovery. Carries a truncated preview of the
    /// raw text for diagnostics.
    #[error("malformed model response: {preview}")]
    MalformedResponse { preview: String },

    /// The response parsed, but contains no `questions` array.
    #[error("model response is missing the `questions` array")]
    MissingQuestionsField,
}

impl ExtractError {
    /// Returns the raw-text preview, if this error carries one.
    pub fn preview(&self) -> Option<&str> {
        match self {
            ExtractError::MalformedResponse { preview } => Some(preview),
            ExtractError::MissingQuestionsField => None,
        }
    }
}
