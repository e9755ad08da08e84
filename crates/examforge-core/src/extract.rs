//! Ingestion pipeline: raw model text → validated canonical questions.
//!
//! Ties the normalizer, canonicalizer, and validator together. Per-question
//! problems (unknown tags, decode failures, invariant violations) are
//! collected and returned alongside the accepted questions, so a partially
//! bad batch still yields a usable, truncated test. Only the two
//! [`ExtractError`] cases abort the whole batch.

use serde_json::Value;

use crate::canonical::canonicalize_question;
use crate::error::ExtractError;
use crate::model::{InvalidQuestion, QuestionVariant, KNOWN_QUESTION_TYPES};
use crate::normalize::normalize_response;
use crate::traits::{ExtractionRequest, ModelClient};
use crate::validate::validate_positioned;

/// The result of ingesting one model response.
#[derive(Debug, Clone, Default)]
pub struct ExtractOutcome {
    /// Canonical, validated questions in document order.
    pub questions: Vec<QuestionVariant>,
    /// Questions the model itself flagged as undeterminable.
    pub invalid_questions: Vec<InvalidQuestion>,
    /// Per-question errors for everything that was dropped.
    pub errors: Vec<String>,
}

/// Run the full ingestion pipeline over a raw model response.
pub fn extract_questions(raw: &str) -> Result<ExtractOutcome, ExtractError> {
    let batch = normalize_response(raw)?;

    let mut decoded = Vec::with_capacity(batch.questions.len());
    let mut errors = Vec::new();

    for (idx, value) in batch.questions.iter().enumerate() {
        let position = idx + 1;
        match decode_question(value) {
            Ok(question) => decoded.push((position, canonicalize_question(question))),
            Err(reason) => errors.push(format!("question {position}: {reason}")),
        }
    }

    let (questions, validation_errors) = validate_positioned(decoded);
    errors.extend(validation_errors);

    if !errors.is_empty() {
        tracing::warn!(
            accepted = questions.len(),
            dropped = errors.len(),
            "batch accepted with per-question errors"
        );
    }

    Ok(ExtractOutcome {
        questions,
        invalid_questions: batch.invalid_questions,
        errors,
    })
}

fn decode_question(value: &Value) -> Result<QuestionVariant, String> {
    let tag = value
        .get("questionType")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing questionType tag".to_string())?;

    if !KNOWN_QUESTION_TYPES.contains(&tag) {
        return Err(format!("unknown question type `{tag}`"));
    }

    serde_json::from_value::<QuestionVariant>(value.clone()).map_err(|e| e.to_string())
}

/// Ask a model client for questions, then run the ingestion pipeline on its
/// response.
pub async fn extract_with_client(
    client: &dyn ModelClient,
    request: &ExtractionRequest,
) -> anyhow::Result<ExtractOutcome> {
    tracing::info!(
        client = client.name(),
        document = %request.document_name,
        "requesting question extraction"
    );

    let response = client.complete(request).await?;
    tracing::debug!(
        model = %response.model,
        latency_ms = response.latency_ms,
        "model response received"
    );

    let outcome = extract_questions(&response.content)?;
    tracing::info!(
        accepted = outcome.questions.len(),
        invalid = outcome.invalid_questions.len(),
        errors = outcome.errors.len(),
        "extraction complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MatchPair, MatchSpec};
    use crate::traits::MockModelClient;

    const FULL_RESPONSE: &str = r#"Here are the questions I extracted:

```json
{
  "questions": [
    {
      "questionType": "multiple_choice",
      "questionText": "Capital of France? (A. Paris B. Lyon C. Nice)",
      "answerProvided": true,
      "options": ["A. Paris", "B. Lyon", "C. Nice"],
      "correctOptionIndex": 0
    },
    {
      "questionType": "matching",
      "questionText": "Match country to capital",
      "answerProvided": true,
      "leftColumn": ["France", "Italy"],
      "rightColumn": ["Rome", "Paris"],
      "correctMatches": "1-2, 2-1"
    },
    {
      "questionType": "essay_bonus",
      "questionText": "A shape we do not support"
    },
    {
      "questionType": "true_false",
      "questionText": "",
      "correctAnswer": true
    }
  ],
  "invalidQuestions": [
    {"questionNumber": "9", "reason": "answer key missing", "rawText": "Q9 ..."}
  ]
}
```

Let me know if you need anything else."#;

    #[test]
    fn full_pipeline_accepts_canonicalizes_and_reports() {
        let outcome = extract_questions(FULL_RESPONSE).unwrap();

        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(outcome.invalid_questions.len(), 1);
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].contains("unknown question type `essay_bonus`"));
        assert!(outcome.errors[0].starts_with("question 3:"));
        // The blank question keeps its document position even though the
        // unknown-tag question before it was dropped at decode time.
        assert!(outcome.errors[1].starts_with("question 4:"), "{}", outcome.errors[1]);
        assert!(outcome.errors[1].contains("question text is empty"));

        // Canonicalization ran: labels stripped, run removed, matches decoded.
        match &outcome.questions[0] {
            QuestionVariant::MultipleChoice {
                question_text,
                options,
                ..
            } => {
                assert_eq!(question_text, "Capital of France?");
                assert_eq!(options, &["Paris", "Lyon", "Nice"]);
            }
            other => panic!("unexpected variant: {other:?}"),
        }
        match &outcome.questions[1] {
            QuestionVariant::Matching {
                correct_matches: Some(MatchSpec::Pairs(pairs)),
                ..
            } => assert_eq!(
                pairs,
                &[
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
    fn empty_questions_array_reports_no_questions() {
        let outcome = extract_questions(r#"{"questions": []}"#).unwrap();
        assert!(outcome.questions.is_empty());
        assert_eq!(outcome.errors, vec!["no questions found"]);
    }

    #[test]
    fn malformed_response_is_fatal() {
        let err = extract_questions("I could not read the document, sorry.").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn extract_with_mock_client() {
        let client = MockModelClient::with_fixed_response(FULL_RESPONSE);
        let request = ExtractionRequest {
            document_text: "GEOGRAPHY MIDTERM ...".into(),
            document_name: "midterm.pdf".into(),
            max_tokens: 4096,
        };

        let outcome = extract_with_client(&client, &request).await.unwrap();
        assert_eq!(outcome.questions.len(), 2);
        assert_eq!(client.call_count(), 1);
    }
}
