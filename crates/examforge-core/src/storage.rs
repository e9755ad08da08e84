//! Flattened persisted question shape.
//!
//! The storage collaborator keeps one flat record per question. The
//! `correct_text` column is reused to carry `descriptive.sampleAnswer` and
//! `composite.fillInCorrectText` — a compatibility shape; the in-memory
//! model never shares fields across variants. Conversion in both directions
//! is lossless for every variant.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::model::{MatchPair, MatchSpec, QuestionVariant};

/// One flattened question record as the storage layer persists it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuestion {
    pub question_type: String,
    pub question_text: String,
    /// 0-based position in the test.
    pub order: usize,
    #[serde(default)]
    pub answer_provided: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<Vec<usize>>,
    /// Carries `fillBlank.correctText`, `descriptive.sampleAnswer`, or
    /// `composite.fillInCorrectText` depending on `question_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_column: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_column: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_matches: Option<Vec<MatchPair>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_in_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_order: Option<Vec<usize>>,
}

impl StoredQuestion {
    /// Flatten a canonical question for persistence.
    pub fn from_variant(order: usize, question: &QuestionVariant) -> Self {
        let mut record = StoredQuestion {
            question_type: question.question_type().to_string(),
            question_text: question.question_text().to_string(),
            order,
            ..StoredQuestion::default()
        };

        match question {
            QuestionVariant::MultipleChoice {
                answer_provided,
                options,
                correct_option_index,
                ..
            } => {
                record.answer_provided = *answer_provided;
                record.options = Some(options.clone());
                record.correct_option_index = *correct_option_index;
            }
            QuestionVariant::MultipleAnswer {
                answer_provided,
                options,
                correct_answers,
                ..
            } => {
                record.answer_provided = *answer_provided;
                record.options = Some(options.clone());
                record.correct_answers = correct_answers
                    .as_ref()
                    .map(|set| set.iter().copied().collect());
            }
            QuestionVariant::FillBlank {
                answer_provided,
                correct_text,
                ..
            } => {
                record.answer_provided = *answer_provided;
                record.correct_text = correct_text.clone();
            }
            QuestionVariant::Descriptive {
                answer_provided,
                sample_answer,
                ..
            } => {
                record.answer_provided = *answer_provided;
                record.correct_text = sample_answer.clone();
            }
            QuestionVariant::Matching {
                answer_provided,
                left_column,
                right_column,
                correct_matches,
                ..
            } => {
                record.answer_provided = *answer_provided;
                record.left_column = Some(left_column.clone());
                record.right_column = Some(right_column.clone());
                record.correct_matches = match correct_matches {
                    Some(MatchSpec::Pairs(pairs)) => Some(pairs.clone()),
                    _ => None,
                };
            }
            QuestionVariant::Composite {
                answer_provided,
                options,
                correct_option_index,
                fill_in_prompt,
                fill_in_correct_text,
                ..
            } => {
                record.answer_provided = *answer_provided;
                record.options = Some(options.clone());
                record.correct_option_index = *correct_option_index;
                record.fill_in_prompt = Some(fill_in_prompt.clone());
                record.correct_text = fill_in_correct_text.clone();
            }
            QuestionVariant::TrueFalse {
                answer_provided,
                correct_answer,
                ..
            } => {
                record.answer_provided = *answer_provided;
                record.correct_answer = *correct_answer;
            }
            QuestionVariant::Sequencing {
                answer_provided,
                items,
                correct_order,
                ..
            } => {
                record.answer_provided = *answer_provided;
                record.items = Some(items.clone());
                record.correct_order = correct_order.clone();
            }
        }

        record
    }

    /// Rebuild the canonical question from its flattened record.
    pub fn to_variant(&self) -> Result<QuestionVariant> {
        let question_text = self.question_text.clone();
        let answer_provided = self.answer_provided;

        let question = match self.question_type.as_str() {
            "multiple_choice" => QuestionVariant::MultipleChoice {
                question_text,
                answer_provided,
                options: self.options.clone().unwrap_or_default(),
                correct_option_index: self.correct_option_index,
            },
            "multiple_answer" => QuestionVariant::MultipleAnswer {
                question_text,
                answer_provided,
                options: self.options.clone().unwrap_or_default(),
                correct_answers: self
                    .correct_answers
                    .as_ref()
                    .map(|v| v.iter().copied().collect()),
            },
            "fill_blank" => QuestionVariant::FillBlank {
                question_text,
                answer_provided,
                correct_text: self.correct_text.clone(),
            },
            "descriptive" => QuestionVariant::Descriptive {
                question_text,
                answer_provided,
                sample_answer: self.correct_text.clone(),
            },
            "matching" => QuestionVariant::Matching {
                question_text,
                answer_provided,
                left_column: self.left_column.clone().unwrap_or_default(),
                right_column: self.right_column.clone().unwrap_or_default(),
                correct_matches: self.correct_matches.clone().map(MatchSpec::Pairs),
            },
            "composite" => QuestionVariant::Composite {
                question_text,
                answer_provided,
                options: self.options.clone().unwrap_or_default(),
                correct_option_index: self.correct_option_index,
                fill_in_prompt: self.fill_in_prompt.clone().unwrap_or_default(),
                fill_in_correct_text: self.correct_text.clone(),
            },
            "true_false" => QuestionVariant::TrueFalse {
                question_text,
                answer_provided,
                correct_answer: self.correct_answer,
            },
            "sequencing" => QuestionVariant::Sequencing {
                question_text,
                answer_provided,
                items: self.items.clone().unwrap_or_default(),
                correct_order: self.correct_order.clone(),
            },
            other => bail!("unknown stored question type: {other}"),
        };

        Ok(question)
    }
}

/// Flatten a batch in question order.
pub fn store_batch(questions: &[QuestionVariant]) -> Vec<StoredQuestion> {
    questions
        .iter()
        .enumerate()
        .map(|(order, q)| StoredQuestion::from_variant(order, q))
        .collect()
}

/// Rebuild a batch, restoring question order from the `order` column.
pub fn load_batch(mut records: Vec<StoredQuestion>) -> Result<Vec<QuestionVariant>> {
    records.sort_by_key(|r| r.order);
    records.iter().map(StoredQuestion::to_variant).collect()
}
