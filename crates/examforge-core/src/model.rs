//! Core data model types for examforge.
//!
//! `QuestionVariant` is the canonical question record the whole system is
//! built around: created once by the ingestion pipeline, immutable
//! afterwards, read many times by the grading engine. The serde
//! representation (internally tagged on `questionType`, camelCase field
//! names) reproduces the external JSON contract the model is asked to emit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Question type tags accepted by the ingestion pipeline.
pub const KNOWN_QUESTION_TYPES: &[&str] = &[
    "multiple_choice",
    "multiple_answer",
    "fill_blank",
    "descriptive",
    "matching",
    "composite",
    "true_false",
    "sequencing",
];

/// A single exam question in one of eight shapes.
///
/// Every variant carries `question_text` (non-empty after validation) and
/// `answer_provided` (true only if the source document contained an explicit
/// answer marker). Index fields are 0-based; range checks happen in
/// [`crate::validate`], not at deserialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "questionType",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum QuestionVariant {
    /// One correct option out of a list.
    MultipleChoice {
        question_text: String,
        #[serde(default)]
        answer_provided: bool,
        options: Vec<String>,
        #[serde(default)]
        correct_option_index: Option<usize>,
    },
    /// A set of correct options; exact set equality required.
    MultipleAnswer {
        question_text: String,
        #[serde(default)]
        answer_provided: bool,
        options: Vec<String>,
        #[serde(default)]
        correct_answers: Option<BTreeSet<usize>>,
    },
    /// Free-text blank with a single expected answer.
    FillBlank {
        question_text: String,
        #[serde(default)]
        answer_provided: bool,
        #[serde(default)]
        correct_text: Option<String>,
    },
    /// Long-form answer; never auto-graded, excluded from the score
    /// denominator.
    Descriptive {
        question_text: String,
        #[serde(default)]
        answer_provided: bool,
        #[serde(default)]
        sample_answer: Option<String>,
    },
    /// Left column items matched to right column items.
    Matching {
        question_text: String,
        #[serde(default)]
        answer_provided: bool,
        left_column: Vec<String>,
        right_column: Vec<String>,
        /// Accepts the compact `"1-3, 2-1"` string encoding at ingestion
        /// time; canonical form is always explicit pairs.
        #[serde(default)]
        correct_matches: Option<MatchSpec>,
    },
    /// A multiple-choice half plus a fill-in half; both must be correct.
    Composite {
        question_text: String,
        #[serde(default)]
        answer_provided: bool,
        options: Vec<String>,
        #[serde(default)]
        correct_option_index: Option<usize>,
        fill_in_prompt: String,
        #[serde(default)]
        fill_in_correct_text: Option<String>,
    },
    TrueFalse {
        question_text: String,
        #[serde(default)]
        answer_provided: bool,
        #[serde(default)]
        correct_answer: Option<bool>,
    },
    /// Items to be placed in a specific order.
    Sequencing {
        question_text: String,
        #[serde(default)]
        answer_provided: bool,
        items: Vec<String>,
        /// A permutation of `0..items.len()` when present.
        #[serde(default)]
        correct_order: Option<Vec<usize>>,
    },
}

impl QuestionVariant {
    /// The `questionType` tag for this variant.
    pub fn question_type(&self) -> &'static str {
        match self {
            QuestionVariant::MultipleChoice { .. } => "multiple_choice",
            QuestionVariant::MultipleAnswer { .. } => "multiple_answer",
            QuestionVariant::FillBlank { .. } => "fill_blank",
            QuestionVariant::Descriptive { .. } => "descriptive",
            QuestionVariant::Matching { .. } => "matching",
            QuestionVariant::Composite { .. } => "composite",
            QuestionVariant::TrueFalse { .. } => "true_false",
            QuestionVariant::Sequencing { .. } => "sequencing",
        }
    }

    pub fn question_text(&self) -> &str {
        match self {
            QuestionVariant::MultipleChoice { question_text, .. }
            | QuestionVariant::MultipleAnswer { question_text, .. }
            | QuestionVariant::FillBlank { question_text, .. }
            | QuestionVariant::Descriptive { question_text, .. }
            | QuestionVariant::Matching { question_text, .. }
            | QuestionVariant::Composite { question_text, .. }
            | QuestionVariant::TrueFalse { question_text, .. }
            | QuestionVariant::Sequencing { question_text, .. } => question_text,
        }
    }

    /// Whether this question counts toward the score denominator.
    pub fn is_gradable(&self) -> bool {
        !matches!(self, QuestionVariant::Descriptive { .. })
    }
}

/// One left-to-right match, 0-based on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPair {
    pub left_index: usize,
    pub right_index: usize,
}

/// The `correctMatches` field as the model may emit it: either an explicit
/// pair list or the compact 1-based `"L-R, L-R"` string. Canonicalization
/// converts the string form to pairs; the pair form passes through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatchSpec {
    Pairs(Vec<MatchPair>),
    Encoded(String),
}

/// A question the model could not turn into a gradable record.
///
/// Reported alongside the accepted batch; never graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidQuestion {
    #[serde(default)]
    pub question_number: Option<String>,
    pub reason: String,
    pub raw_text: String,
}
