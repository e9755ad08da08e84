//! Canonicalizer: per-variant text and label cleanup.
//!
//! Three independent transforms, each pure and idempotent:
//! option-label stripping, embedded-option-run removal from question
//! bodies, and compact matching-string decoding. `canonicalize_question`
//! composes them per variant; re-running it on an already-canonical
//! question is a no-op.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{MatchPair, MatchSpec, QuestionVariant};

// A leading `<LETTER><.|)>` or `<DIGITS><.|)>` label, optional surrounding
// space, remainder captured as the option text.
static OPTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*(?:([A-Za-z])|(\d+))\s*[.)]\s*(.*)$").unwrap());

// A label token opening one option group: `1)`, `12.`, `A)`, `c.`.
static RUN_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+|[A-Za-z])\s*[.)]").unwrap());

static REPEATED_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// An option string with its human-facing label split off.
///
/// Labels are positional after canonicalization; only `text` is ever stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrippedOption {
    /// `A→1 .. Z→26`, numeric labels pass through, `0` when no label.
    pub label: u32,
    pub text: String,
}

/// Split a leading option label from its text.
///
/// An option whose remainder itself starts with a label pattern (e.g.
/// `"A. B. foo"`, `"1) 1.5 kg"`) is ambiguous and left untouched; stripping
/// only the outer label would make a second application strip again.
pub fn strip_option_label(option: &str) -> StrippedOption {
    if let Some(caps) = OPTION_LABEL.captures(option) {
        let label = if let Some(letter) = caps.get(1) {
            let c = letter.as_str().chars().next().unwrap_or('A');
            u32::from(c.to_ascii_uppercase()) - u32::from('A') + 1
        } else {
            caps.get(2)
                .and_then(|d| d.as_str().parse::<u32>().ok())
                .unwrap_or(0)
        };
        let text = caps.get(3).map_or("", |m| m.as_str()).trim();
        if label > 0 && !OPTION_LABEL.is_match(text) {
            return StrippedOption {
                label,
                text: text.to_string(),
            };
        }
    }
    StrippedOption {
        label: 0,
        text: option.trim().to_string(),
    }
}

/// Delete parenthesized option-list runs the model duplicated into the
/// question body, e.g. `"(1) foo 2) bar 3) baz 4) qux)"`.
///
/// A run opens at a parenthesis, spans 3 or more label groups including the
/// last group's text, and absorbs the closing paren when one follows (the
/// model sometimes opens a run and never closes it). Runs of fewer than 3
/// groups are left untouched, and cleanup (whitespace collapse,
/// stray-punctuation trim) only happens after an actual deletion.
pub fn remove_embedded_options(text: &str) -> String {
    let mut spans = Vec::new();
    let mut from = 0;
    while let Some(offset) = text[from..].find('(') {
        let open = from + offset;
        match run_end(text, open) {
            Some(end) => {
                spans.push((open, end));
                from = end;
            }
            None => from = open + 1,
        }
    }
    if spans.is_empty() {
        return text.to_string();
    }

    let mut cleaned = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in spans {
        cleaned.push_str(&text[last..start]);
        cleaned.push(' ');
        last = end;
    }
    cleaned.push_str(&text[last..]);

    let collapsed = REPEATED_WHITESPACE.replace_all(&cleaned, " ");
    collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | ',' | '.'))
        .to_string()
}

/// The exclusive end of the option run opening at the paren at byte `open`,
/// or `None` when fewer than 3 label groups follow it.
fn run_end(text: &str, open: usize) -> Option<usize> {
    let mut pos = open + 1;
    let mut groups = 0;
    loop {
        let rest = &text[pos..];
        let at = pos + (rest.len() - rest.trim_start().len());
        let Some(label) = RUN_LABEL.find(&text[at..]) else {
            break;
        };
        groups += 1;
        pos = option_text_end(text, at + label.end());
    }
    if groups < 3 {
        return None;
    }
    if text[pos..].starts_with(')') {
        pos += 1;
    }
    Some(pos)
}

/// One group's option text ends at a parenthesis or at the next
/// whitespace-separated label token.
fn option_text_end(text: &str, start: usize) -> usize {
    let mut boundary = true;
    for (i, c) in text[start..].char_indices() {
        if c == '(' || c == ')' {
            return start + i;
        }
        if boundary && RUN_LABEL.is_match(&text[start + i..]) {
            return start + i;
        }
        boundary = c.is_whitespace();
    }
    text.len()
}

/// Decode the compact 1-based `"L-R, L-R"` matching encoding into explicit
/// 0-based pairs.
///
/// Malformed pairs are skipped individually; `None` means "no correct
/// matches known", which is distinct from an empty set.
pub fn decode_match_string(encoded: &str) -> Option<Vec<MatchPair>> {
    let mut pairs = Vec::new();
    for part in encoded.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((left, right)) = part.split_once('-') else {
            continue;
        };
        let (Ok(left), Ok(right)) = (left.trim().parse::<usize>(), right.trim().parse::<usize>())
        else {
            continue;
        };
        // 1-based on the wire; zero has no 0-based counterpart.
        if left == 0 || right == 0 {
            continue;
        }
        pairs.push(MatchPair {
            left_index: left - 1,
            right_index: right - 1,
        });
    }
    if pairs.is_empty() {
        None
    } else {
        Some(pairs)
    }
}

fn strip_labels(options: Vec<String>) -> Vec<String> {
    options
        .into_iter()
        .map(|o| strip_option_label(&o).text)
        .collect()
}

/// Apply every canonicalization transform appropriate to the variant.
pub fn canonicalize_question(question: QuestionVariant) -> QuestionVariant {
    match question {
        QuestionVariant::MultipleChoice {
            question_text,
            answer_provided,
            options,
            correct_option_index,
        } => QuestionVariant::MultipleChoice {
            question_text: remove_embedded_options(&question_text),
            answer_provided,
            options: strip_labels(options),
            correct_option_index,
        },
        QuestionVariant::MultipleAnswer {
            question_text,
            answer_provided,
            options,
            correct_answers,
        } => QuestionVariant::MultipleAnswer {
            question_text: remove_embedded_options(&question_text),
            answer_provided,
            options: strip_labels(options),
            correct_answers,
        },
        QuestionVariant::FillBlank {
            question_text,
            answer_provided,
            correct_text,
        } => QuestionVariant::FillBlank {
            question_text: remove_embedded_options(&question_text),
            answer_provided,
            correct_text,
        },
        QuestionVariant::Descriptive {
            question_text,
            answer_provided,
            sample_answer,
        } => QuestionVariant::Descriptive {
            question_text: remove_embedded_options(&question_text),
            answer_provided,
            sample_answer,
        },
        QuestionVariant::Matching {
            question_text,
            answer_provided,
            left_column,
            right_column,
            correct_matches,
        } => QuestionVariant::Matching {
            question_text: remove_embedded_options(&question_text),
            answer_provided,
            left_column,
            right_column,
            correct_matches: match correct_matches {
                Some(MatchSpec::Encoded(s)) => decode_match_string(&s).map(MatchSpec::Pairs),
                other => other,
            },
        },
        QuestionVariant::Composite {
            question_text,
            answer_provided,
            options,
            correct_option_index,
            fill_in_prompt,
            fill_in_correct_text,
        } => QuestionVariant::Composite {
            question_text: remove_embedded_options(&question_text),
            answer_provided,
            options: strip_labels(options),
            correct_option_index,
            fill_in_prompt,
            fill_in_correct_text,
        },
        QuestionVariant::TrueFalse {
            question_text,
            answer_provided,
            correct_answer,
        } => QuestionVariant::TrueFalse {
            question_text: remove_embedded_options(&question_text),
            answer_provided,
            correct_answer,
        },
        QuestionVariant::Sequencing {
            question_text,
            answer_provided,
            items,
            correct_order,
        } => QuestionVariant::Sequencing {
            question_text: remove_embedded_options(&question_text),
            answer_provided,
            items,
            correct_order,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_labels_map_to_positions() {
        assert_eq!(
            strip_option_label("A. Paris"),
            StrippedOption {
                label: 1,
                text: "Paris".into()
            }
        );
        assert_eq!(strip_option_label("Z) last").label, 26);
        assert_eq!(strip_option_label("c) third").label, 3);
    }

    #[test]
    fn letter_label_with_inner_space() {
        // Optional space between letter and delimiter is allowed.
        let s = strip_option_label("B ) spaced");
        assert_eq!(s.label, 2);
        assert_eq!(s.text, "spaced");
    }

    #[test]
    fn numeric_labels_pass_through() {
        let s = strip_option_label("12) twelfth option");
        assert_eq!(s.label, 12);
        assert_eq!(s.text, "twelfth option");

        let s = strip_option_label("1. first");
        assert_eq!(s.label, 1);
        assert_eq!(s.text, "first");
    }

    #[test]
    fn unlabeled_options_keep_text() {
        let s = strip_option_label("  plain option  ");
        assert_eq!(s.label, 0);
        assert_eq!(s.text, "plain option");

        // No delimiter after the letter, so no label.
        let s = strip_option_label("France");
        assert_eq!(s.label, 0);
        assert_eq!(s.text, "France");
    }

    #[test]
    fn double_labeled_options_left_untouched() {
        let s = strip_option_label("A. B. foo");
        assert_eq!(s.label, 0);
        assert_eq!(s.text, "A. B. foo");

        // A second application changes nothing.
        let again = strip_option_label(&s.text);
        assert_eq!(again, s);
    }

    #[test]
    fn removes_embedded_option_run() {
        let text = "What is the capital? (1) Paris 2) Lyon 3) Nice 4) Lille)";
        assert_eq!(remove_embedded_options(text), "What is the capital?");
    }

    #[test]
    fn run_deletion_spans_the_final_option_text() {
        // The last option's text sits between its label and the closing
        // paren; the whole run goes, not just the labeled prefix.
        let text = "Choose (1) red 2) blue 3) green) carefully.";
        assert_eq!(remove_embedded_options(text), "Choose carefully");
    }

    #[test]
    fn removes_run_without_closing_paren() {
        let text = "Pick one (A. red B. green C. blue";
        assert_eq!(remove_embedded_options(text), "Pick one");
    }

    #[test]
    fn keeps_short_parentheticals() {
        let text = "Newton's second law (F = ma) states what?";
        assert_eq!(remove_embedded_options(text), text);

        let two = "Choose (1) yes or 2) no";
        assert_eq!(remove_embedded_options(two), two);
    }

    #[test]
    fn removal_is_idempotent() {
        let text = "Question? (1. a 2. b 3. c)";
        let once = remove_embedded_options(text);
        assert_eq!(remove_embedded_options(&once), once);
    }

    #[test]
    fn decodes_match_string() {
        assert_eq!(
            decode_match_string("1-3, 2-1, 3-2"),
            Some(vec![
                MatchPair {
                    left_index: 0,
                    right_index: 2
                },
                MatchPair {
                    left_index: 1,
                    right_index: 0
                },
                MatchPair {
                    left_index: 2,
                    right_index: 1
                },
            ])
        );
    }

    #[test]
    fn skips_malformed_pairs() {
        assert_eq!(
            decode_match_string("1-2, oops, 3, x-y, 2-1"),
            Some(vec![
                MatchPair {
                    left_index: 0,
                    right_index: 1
                },
                MatchPair {
                    left_index: 1,
                    right_index: 0
                },
            ])
        );
    }

    #[test]
    fn no_surviving_pairs_means_unknown() {
        assert_eq!(decode_match_string(""), None);
        assert_eq!(decode_match_string("garbage"), None);
        assert_eq!(decode_match_string("0-1"), None); // zero is not 1-based
    }

    #[test]
    fn canonicalize_strips_labels_and_decodes_matches() {
        let q = QuestionVariant::MultipleChoice {
            question_text: "Capital? (A. Paris B. Lyon C. Nice)".into(),
            answer_provided: true,
            options: vec!["A. Paris".into(), "B. Lyon".into(), "C. Nice".into()],
            correct_option_index: Some(0),
        };
        let canonical = canonicalize_question(q);
        match &canonical {
            QuestionVariant::MultipleChoice {
                question_text,
                options,
                ..
            } => {
                assert_eq!(question_text, "Capital?");
                assert_eq!(options, &["Paris", "Lyon", "Nice"]);
            }
            other => panic!("unexpected variant: {other:?}"),
        }

        let m = QuestionVariant::Matching {
            question_text: "Match them".into(),
            answer_provided: true,
            left_column: vec!["a".into(), "b".into()],
            right_column: vec!["x".into(), "y".into()],
            correct_matches: Some(MatchSpec::Encoded("1-2, 2-1".into())),
        };
        match canonicalize_question(m) {
            QuestionVariant::Matching {
                correct_matches: Some(MatchSpec::Pairs(pairs)),
                ..
            } => assert_eq!(
                pairs,
                vec![
                    MatchPair {
                        left_index: 0,
                        right_index: 1
                    },
                    MatchPair {
                        left_index: 1,
                        right_index: 0
                    }
                ]
            ),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let questions = vec![
            QuestionVariant::MultipleChoice {
                question_text: "Capital? (1) Paris 2) Lyon 3) Nice)".into(),
                answer_provided: true,
                options: vec!["A. Paris".into(), "B. Lyon".into(), "C. Nice".into()],
                correct_option_index: Some(0),
            },
            QuestionVariant::Matching {
                question_text: "Match".into(),
                answer_provided: true,
                left_column: vec!["a".into(), "b".into()],
                right_column: vec!["x".into(), "y".into()],
                correct_matches: Some(MatchSpec::Encoded("1-1, 2-2".into())),
            },
            QuestionVariant::Sequencing {
                question_text: "Order the steps".into(),
                answer_provided: true,
                items: vec!["boil".into(), "pour".into(), "steep".into()],
                correct_order: Some(vec![0, 1, 2]),
            },
        ];
        for q in questions {
            let once = canonicalize_question(q);
            let twice = canonicalize_question(once.clone());
            assert_eq!(once, twice);
        }
    }
}
