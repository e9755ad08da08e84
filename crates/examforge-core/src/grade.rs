//! Grading engine: canonical questions + submitted answers → results.
//!
//! Grading is total. Submissions are loosely typed (`serde_json::Value`
//! per question, as posted by a form layer); absent or garbage values
//! degrade to "incorrect", never to an error. Every variant is handled by
//! one exhaustive match, so adding a question shape forces a decision here.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{MatchPair, MatchSpec, QuestionVariant};
use crate::report::GradingReport;

/// A submitted answer sheet: question identifier (stringified 0-based
/// order) → raw answer value. Matching questions use auxiliary keys of the
/// form `<id>_<leftIndex>` carrying the selected right-column index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    pub answers: BTreeMap<String, Value>,
}

impl Submission {
    pub fn answer(&self, question_id: &str) -> Option<&Value> {
        self.answers.get(question_id)
    }

    pub fn matching_answer(&self, question_id: &str, left_index: usize) -> Option<&Value> {
        self.answers.get(&format!("{question_id}_{left_index}"))
    }
}

/// The per-question outcome, mirroring [`QuestionVariant`] shape for shape.
///
/// Echo fields (correct option, correct matches, sample answer) are what a
/// review screen needs to display the question next to the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "questionType",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum GradingResult {
    MultipleChoice {
        question_text: String,
        options: Vec<String>,
        user_answer: Option<usize>,
        correct_option_index: Option<usize>,
        is_correct: bool,
    },
    MultipleAnswer {
        question_text: String,
        options: Vec<String>,
        user_answers: Vec<usize>,
        correct_answers: Vec<usize>,
        is_correct: bool,
    },
    FillBlank {
        question_text: String,
        user_answer: String,
        correct_text: Option<String>,
        is_correct: bool,
    },
    /// Always reported correct for display; never counted in the score.
    Descriptive {
        question_text: String,
        user_answer: String,
        sample_answer: Option<String>,
        is_correct: bool,
    },
    Matching {
        question_text: String,
        left_column: Vec<String>,
        right_column: Vec<String>,
        user_matches: Vec<MatchPair>,
        correct_matches: Vec<MatchPair>,
        is_correct: bool,
    },
    Composite {
        question_text: String,
        options: Vec<String>,
        user_option: Option<usize>,
        correct_option_index: Option<usize>,
        fill_in_prompt: String,
        user_fill_in: String,
        fill_in_correct_text: Option<String>,
        option_correct: bool,
        fill_in_correct: bool,
        is_correct: bool,
    },
    TrueFalse {
        question_text: String,
        user_answer: Option<bool>,
        correct_answer: Option<bool>,
        is_correct: bool,
    },
    Sequencing {
        question_text: String,
        items: Vec<String>,
        user_order: Vec<usize>,
        correct_order: Option<Vec<usize>>,
        is_correct: bool,
    },
}

impl GradingResult {
    pub fn is_correct(&self) -> bool {
        match self {
            GradingResult::MultipleChoice { is_correct, .. }
            | GradingResult::MultipleAnswer { is_correct, .. }
            | GradingResult::FillBlank { is_correct, .. }
            | GradingResult::Descriptive { is_correct, .. }
            | GradingResult::Matching { is_correct, .. }
            | GradingResult::Composite { is_correct, .. }
            | GradingResult::TrueFalse { is_correct, .. }
            | GradingResult::Sequencing { is_correct, .. } => *is_correct,
        }
    }

    pub fn is_descriptive(&self) -> bool {
        matches!(self, GradingResult::Descriptive { .. })
    }

    /// The wire tag for this result, matching `questionType` in JSON.
    pub fn question_type(&self) -> &'static str {
        match self {
            GradingResult::MultipleChoice { .. } => "multiple_choice",
            GradingResult::MultipleAnswer { .. } => "multiple_answer",
            GradingResult::FillBlank { .. } => "fill_blank",
            GradingResult::Descriptive { .. } => "descriptive",
            GradingResult::Matching { .. } => "matching",
            GradingResult::Composite { .. } => "composite",
            GradingResult::TrueFalse { .. } => "true_false",
            GradingResult::Sequencing { .. } => "sequencing",
        }
    }

    pub fn question_text(&self) -> &str {
        match self {
            GradingResult::MultipleChoice { question_text, .. }
            | GradingResult::MultipleAnswer { question_text, .. }
            | GradingResult::FillBlank { question_text, .. }
            | GradingResult::Descriptive { question_text, .. }
            | GradingResult::Matching { question_text, .. }
            | GradingResult::Composite { question_text, .. }
            | GradingResult::TrueFalse { question_text, .. }
            | GradingResult::Sequencing { question_text, .. } => question_text,
        }
    }
}

/// Grade one question against its submitted answer. Never fails.
pub fn grade_question(
    question: &QuestionVariant,
    question_id: &str,
    submission: &Submission,
) -> GradingResult {
    let answer = submission.answer(question_id);

    match question {
        QuestionVariant::MultipleChoice {
            question_text,
            options,
            correct_option_index,
            ..
        } => {
            let user_answer = answer.and_then(parse_index);
            let is_correct = matches!(
                (user_answer, correct_option_index),
                (Some(u), Some(c)) if u == *c
            );
            GradingResult::MultipleChoice {
                question_text: question_text.clone(),
                options: options.clone(),
                user_answer,
                correct_option_index: *correct_option_index,
                is_correct,
            }
        }
        QuestionVariant::MultipleAnswer {
            question_text,
            options,
            correct_answers,
            ..
        } => {
            let user_set = answer.map(parse_index_set).unwrap_or_default();
            let is_correct = correct_answers
                .as_ref()
                .is_some_and(|correct| *correct == user_set);
            GradingResult::MultipleAnswer {
                question_text: question_text.clone(),
                options: options.clone(),
                user_answers: user_set.into_iter().collect(),
                correct_answers: correct_answers
                    .as_ref()
                    .map(|s| s.iter().copied().collect())
                    .unwrap_or_default(),
                is_correct,
            }
        }
        QuestionVariant::FillBlank {
            question_text,
            correct_text,
            ..
        } => {
            let user_answer = answer.map(answer_text).unwrap_or_default();
            let is_correct = correct_text
                .as_ref()
                .is_some_and(|expected| text_eq(expected, &user_answer));
            GradingResult::FillBlank {
                question_text: question_text.clone(),
                user_answer,
                correct_text: correct_text.clone(),
                is_correct,
            }
        }
        QuestionVariant::Descriptive {
            question_text,
            sample_answer,
            ..
        } => GradingResult::Descriptive {
            question_text: question_text.clone(),
            user_answer: answer.map(answer_text).unwrap_or_default(),
            sample_answer: sample_answer.clone(),
            is_correct: true,
        },
        QuestionVariant::Matching {
            question_text,
            left_column,
            right_column,
            correct_matches,
            ..
        } => {
            let correct: Vec<MatchPair> = match correct_matches {
                Some(MatchSpec::Pairs(pairs)) => pairs.clone(),
                _ => Vec::new(),
            };

            // userOrder[leftIndex] = selected rightIndex
            let mut user_order: Vec<Option<usize>> = vec![None; left_column.len()];
            for (left_index, slot) in user_order.iter_mut().enumerate() {
                *slot = submission
                    .matching_answer(question_id, left_index)
                    .and_then(parse_index);
            }
            let answered = user_order.iter().flatten().count();

            // Zero known pairs can never be vacuously correct.
            let is_correct = !correct.is_empty()
                && answered == correct.len()
                && correct.iter().all(|pair| {
                    user_order
                        .get(pair.left_index)
                        .copied()
                        .flatten()
                        .is_some_and(|right| right == pair.right_index)
                });

            let user_matches = user_order
                .iter()
                .enumerate()
                .filter_map(|(left_index, right)| {
                    right.map(|right_index| MatchPair {
                        left_index,
                        right_index,
                    })
                })
                .collect();

            GradingResult::Matching {
                question_text: question_text.clone(),
                left_column: left_column.clone(),
                right_column: right_column.clone(),
                user_matches,
                correct_matches: correct,
                is_correct,
            }
        }
        QuestionVariant::Composite {
            question_text,
            options,
            correct_option_index,
            fill_in_prompt,
            fill_in_correct_text,
            ..
        } => {
            let parts = answer.and_then(object_value);
            let user_option = parts
                .as_ref()
                .and_then(|obj| obj.get("selectedOption"))
                .and_then(parse_index);
            let user_fill_in = parts
                .as_ref()
                .and_then(|obj| obj.get("fillInAnswer"))
                .map(answer_text)
                .unwrap_or_default();

            let option_correct = matches!(
                (user_option, correct_option_index),
                (Some(u), Some(c)) if u == *c
            );
            let fill_in_correct = fill_in_correct_text
                .as_ref()
                .is_some_and(|expected| text_eq(expected, &user_fill_in));

            GradingResult::Composite {
                question_text: question_text.clone(),
                options: options.clone(),
                user_option,
                correct_option_index: *correct_option_index,
                fill_in_prompt: fill_in_prompt.clone(),
                user_fill_in,
                fill_in_correct_text: fill_in_correct_text.clone(),
                option_correct,
                fill_in_correct,
                is_correct: option_correct && fill_in_correct,
            }
        }
        QuestionVariant::TrueFalse {
            question_text,
            correct_answer,
            ..
        } => {
            let user_answer = answer.and_then(parse_bool);
            let is_correct = matches!(
                (user_answer, correct_answer),
                (Some(u), Some(c)) if u == *c
            );
            GradingResult::TrueFalse {
                question_text: question_text.clone(),
                user_answer,
                correct_answer: *correct_answer,
                is_correct,
            }
        }
        QuestionVariant::Sequencing {
            question_text,
            items,
            correct_order,
            ..
        } => {
            let user_order = decode_sequence(answer, items.len());
            let is_correct = correct_order
                .as_ref()
                .is_some_and(|correct| *correct == user_order);
            GradingResult::Sequencing {
                question_text: question_text.clone(),
                items: items.clone(),
                user_order,
                correct_order: correct_order.clone(),
                is_correct,
            }
        }
    }
}

/// Grade a whole submission and aggregate the score.
///
/// Question identifiers are the stringified 0-based positions of the
/// questions slice. Descriptive questions are excluded from the gradable
/// denominator; `score = round2(100 * correct / gradable)`, 0 when there is
/// nothing gradable.
pub fn grade_submission(questions: &[QuestionVariant], submission: &Submission) -> GradingReport {
    let mut results = Vec::with_capacity(questions.len());
    let mut correct_count = 0usize;
    let mut gradable_count = 0usize;
    let mut descriptive_count = 0usize;

    for (order, question) in questions.iter().enumerate() {
        let result = grade_question(question, &order.to_string(), submission);
        if result.is_descriptive() {
            descriptive_count += 1;
        } else {
            gradable_count += 1;
            if result.is_correct() {
                correct_count += 1;
            }
        }
        results.push(result);
    }

    let score = if gradable_count == 0 {
        0.0
    } else {
        round2(100.0 * correct_count as f64 / gradable_count as f64)
    };

    GradingReport::new(results, score, correct_count, gradable_count, descriptive_count)
}

/// Round half-up to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Loose submission decoding
// ---------------------------------------------------------------------------

fn parse_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().map(|n| n as usize),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}

fn parse_index_set(value: &Value) -> BTreeSet<usize> {
    match value {
        Value::Array(items) => items.iter().filter_map(parse_index).collect(),
        // Stringified array, e.g. "[2, 0]".
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .filter(Value::is_array)
            .map(|v| parse_index_set(&v))
            .unwrap_or_default(),
        _ => BTreeSet::new(),
    }
}

fn answer_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Trimmed, case-insensitive text comparison for fill-in answers.
fn text_eq(expected: &str, actual: &str) -> bool {
    expected.trim().to_lowercase() == actual.trim().to_lowercase()
}

fn parse_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// An object, possibly arriving as a stringified object.
fn object_value(value: &Value) -> Option<Value> {
    match value {
        Value::Object(_) => Some(value.clone()),
        Value::String(s) => serde_json::from_str::<Value>(s)
            .ok()
            .filter(Value::is_object),
        _ => None,
    }
}

/// Decode a sequencing submission: a map from item index to 1-based target
/// position. Inverted into the ordered item sequence, skipping unfilled
/// positions.
fn decode_sequence(answer: Option<&Value>, item_count: usize) -> Vec<usize> {
    let Some(obj) = answer.and_then(object_value) else {
        return Vec::new();
    };
    let Some(map) = obj.as_object() else {
        return Vec::new();
    };

    let mut slots: Vec<Option<usize>> = vec![None; item_count];
    for (key, value) in map {
        let Ok(item_index) = key.trim().parse::<usize>() else {
            continue;
        };
        let Some(position) = parse_index(value) else {
            continue;
        };
        if item_index < item_count && (1..=item_count).contains(&position) {
            slots[position - 1] = Some(item_index);
        }
    }
    slots.into_iter().flatten().collect()
}
