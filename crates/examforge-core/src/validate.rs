//! Batch validation of canonical questions.
//!
//! Validation never fails the batch: structurally invalid questions are
//! dropped and a human-readable error tagged with the question's 1-based
//! position is collected instead, so a partially bad batch still yields a
//! usable test.

use std::collections::HashSet;

use crate::model::{MatchSpec, QuestionVariant};

/// Validate a batch, returning the accepted questions and per-question
/// errors. An empty batch is rejected outright before per-question checks.
pub fn validate_batch(questions: Vec<QuestionVariant>) -> (Vec<QuestionVariant>, Vec<String>) {
    let positioned = questions
        .into_iter()
        .enumerate()
        .map(|(idx, question)| (idx + 1, question))
        .collect();
    validate_positioned(positioned)
}

/// Like [`validate_batch`], with each question carrying its own 1-based
/// document position. The ingestion pipeline uses this form: decode
/// failures leave gaps in the surviving batch, and errors must still name
/// the document's question numbers.
pub fn validate_positioned(
    questions: Vec<(usize, QuestionVariant)>,
) -> (Vec<QuestionVariant>, Vec<String>) {
    if questions.is_empty() {
        return (Vec::new(), vec!["no questions found".to_string()]);
    }

    let mut accepted = Vec::with_capacity(questions.len());
    let mut errors = Vec::new();

    for (position, question) in questions {
        match check_question(&question) {
            Ok(()) => accepted.push(question),
            Err(reason) => errors.push(format!("question {position}: {reason}")),
        }
    }

    (accepted, errors)
}

fn check_question(question: &QuestionVariant) -> Result<(), String> {
    if question.question_text().trim().is_empty() {
        return Err("question text is empty".to_string());
    }

    match question {
        QuestionVariant::MultipleChoice {
            options,
            correct_option_index,
            ..
        } => {
            check_options(options)?;
            if let Some(i) = correct_option_index {
                check_index("correctOptionIndex", *i, options.len())?;
            }
        }
        QuestionVariant::MultipleAnswer {
            options,
            correct_answers,
            ..
        } => {
            check_options(options)?;
            if let Some(answers) = correct_answers {
                for &i in answers {
                    check_index("correctAnswers entry", i, options.len())?;
                }
            }
        }
        QuestionVariant::FillBlank { .. }
        | QuestionVariant::Descriptive { .. }
        | QuestionVariant::TrueFalse { .. } => {}
        QuestionVariant::Matching {
            left_column,
            right_column,
            correct_matches,
            ..
        } => {
            if left_column.len() < 2 {
                return Err(format!(
                    "matching needs at least 2 left items, got {}",
                    left_column.len()
                ));
            }
            if right_column.len() < 2 {
                return Err(format!(
                    "matching needs at least 2 right items, got {}",
                    right_column.len()
                ));
            }
            match correct_matches {
                Some(MatchSpec::Pairs(pairs)) => {
                    let mut seen_left = HashSet::new();
                    for pair in pairs {
                        check_index("leftIndex", pair.left_index, left_column.len())?;
                        check_index("rightIndex", pair.right_index, right_column.len())?;
                        if !seen_left.insert(pair.left_index) {
                            return Err(format!(
                                "duplicate leftIndex {} in correctMatches",
                                pair.left_index
                            ));
                        }
                    }
                }
                Some(MatchSpec::Encoded(_)) => {
                    // Canonicalization decodes the string form before
                    // validation; reaching it here means it was skipped.
                    return Err("correctMatches was not canonicalized".to_string());
                }
                None => {}
            }
        }
        QuestionVariant::Composite {
            options,
            correct_option_index,
            fill_in_prompt,
            ..
        } => {
            check_options(options)?;
            if let Some(i) = correct_option_index {
                check_index("correctOptionIndex", *i, options.len())?;
            }
            if fill_in_prompt.trim().is_empty() {
                return Err("composite question is missing its fill-in prompt".to_string());
            }
        }
        QuestionVariant::Sequencing {
            items,
            correct_order,
            ..
        } => {
            if let Some(order) = correct_order {
                if !is_permutation(order, items.len()) {
                    return Err(format!(
                        "correctOrder must be a permutation of 0..{}",
                        items.len()
                    ));
                }
            }
        }
    }

    Ok(())
}

fn check_options(options: &[String]) -> Result<(), String> {
    if options.len() < 2 {
        Err(format!("needs at least 2 options, got {}", options.len()))
    } else {
        Ok(())
    }
}

fn check_index(field: &str, index: usize, len: usize) -> Result<(), String> {
    if index < len {
        Ok(())
    } else {
        Err(format!("{field} {index} is out of range (0..{len})"))
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchPair;

    fn mc(text: &str, options: &[&str], correct: Option<usize>) -> QuestionVariant {
        QuestionVariant::MultipleChoice {
            question_text: text.into(),
            answer_provided: correct.is_some(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_option_index: correct,
        }
    }

    #[test]
    fn empty_batch_rejected_outright() {
        let (accepted, errors) = validate_batch(vec![]);
        assert!(accepted.is_empty());
        assert_eq!(errors, vec!["no questions found"]);
    }

    #[test]
    fn accepts_valid_questions() {
        let (accepted, errors) = validate_batch(vec![mc("Q?", &["a", "b"], Some(1))]);
        assert_eq!(accepted.len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn rejects_out_of_range_index_with_position() {
        let (accepted, errors) = validate_batch(vec![
            mc("Q1?", &["a", "b"], Some(0)),
            mc("Q2?", &["a", "b"], Some(2)),
        ]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("question 2:"), "{}", errors[0]);
        assert!(errors[0].contains("out of range"));
    }

    #[test]
    fn positioned_validation_keeps_document_numbering() {
        let (accepted, errors) = validate_positioned(vec![
            (2, mc("Q2?", &["a", "b"], Some(0))),
            (4, mc("   ", &["a", "b"], None)),
        ]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("question 4:"), "{}", errors[0]);
    }

    #[test]
    fn rejects_blank_question_text() {
        let (accepted, errors) = validate_batch(vec![mc("   ", &["a", "b"], None)]);
        assert!(accepted.is_empty());
        assert!(errors[0].contains("question text is empty"));
    }

    #[test]
    fn rejects_too_few_options() {
        let (_, errors) = validate_batch(vec![mc("Q?", &["only"], None)]);
        assert!(errors[0].contains("at least 2 options"));
    }

    #[test]
    fn rejects_duplicate_left_index() {
        let q = QuestionVariant::Matching {
            question_text: "Match".into(),
            answer_provided: true,
            left_column: vec!["a".into(), "b".into()],
            right_column: vec!["x".into(), "y".into()],
            correct_matches: Some(MatchSpec::Pairs(vec![
                MatchPair {
                    left_index: 0,
                    right_index: 0,
                },
                MatchPair {
                    left_index: 0,
                    right_index: 1,
                },
            ])),
        };
        let (accepted, errors) = validate_batch(vec![q]);
        assert!(accepted.is_empty());
        assert!(errors[0].contains("duplicate leftIndex"));
    }

    #[test]
    fn allows_repeated_right_index() {
        // rightIndex reuse is legal at the schema level; the grader's
        // exact-pair comparison is what enforces 1-1 when intended.
        let q = QuestionVariant::Matching {
            question_text: "Match".into(),
            answer_provided: true,
            left_column: vec!["a".into(), "b".into()],
            right_column: vec!["x".into(), "y".into()],
            correct_matches: Some(MatchSpec::Pairs(vec![
                MatchPair {
                    left_index: 0,
                    right_index: 1,
                },
                MatchPair {
                    left_index: 1,
                    right_index: 1,
                },
            ])),
        };
        let (accepted, errors) = validate_batch(vec![q]);
        assert_eq!(accepted.len(), 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn rejects_non_permutation_order() {
        let q = QuestionVariant::Sequencing {
            question_text: "Order".into(),
            answer_provided: true,
            items: vec!["a".into(), "b".into(), "c".into()],
            correct_order: Some(vec![0, 0, 2]),
        };
        let (accepted, errors) = validate_batch(vec![q]);
        assert!(accepted.is_empty());
        assert!(errors[0].contains("permutation"));
    }

    #[test]
    fn composite_requires_fill_in_prompt() {
        let q = QuestionVariant::Composite {
            question_text: "Pick and fill".into(),
            answer_provided: true,
            options: vec!["a".into(), "b".into()],
            correct_option_index: Some(0),
            fill_in_prompt: "  ".into(),
            fill_in_correct_text: Some("x".into()),
        };
        let (_, errors) = validate_batch(vec![q]);
        assert!(errors[0].contains("fill-in prompt"));
    }
}
