//! Grading response types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grade::GradingResult;

/// The complete grading response for one submission attempt.
///
/// Serialized with camelCase field names, like every other boundary type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When grading ran.
    pub graded_at: DateTime<Utc>,
    /// One result per question, in question order.
    pub results: Vec<GradingResult>,
    /// `round2(100 * correct / gradable)`; 0 when nothing is gradable.
    pub score: f64,
    /// Correct answers among gradable questions.
    pub correct_count: usize,
    /// Gradable questions (descriptive excluded).
    pub total_count: usize,
    /// Descriptive questions, reported but not scored.
    pub descriptive_count: usize,
}

impl GradingReport {
    pub fn new(
        results: Vec<GradingResult>,
        score: f64,
        correct_count: usize,
        total_count: usize,
        descriptive_count: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            graded_at: Utc::now(),
            results,
            score,
            correct_count,
            total_count,
            descriptive_count,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let report = GradingReport::new(
            vec![GradingResult::TrueFalse {
                question_text: "Q".into(),
                user_answer: Some(true),
                correct_answer: Some(true),
                is_correct: true,
            }],
            100.0,
            1,
            1,
            0,
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        report.save_json(&path).unwrap();
        let loaded = GradingReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.results.len(), 1);
        assert_eq!(loaded.score, 100.0);
    }

    #[test]
    fn result_serialization_uses_wire_names() {
        let report = GradingReport::new(
            vec![GradingResult::MultipleChoice {
                question_text: "Q".into(),
                options: vec!["a".into(), "b".into()],
                user_answer: Some(0),
                correct_option_index: Some(0),
                is_correct: true,
            }],
            100.0,
            1,
            1,
            0,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["questionType"], "multiple_choice");
        assert_eq!(json["results"][0]["isCorrect"], true);
        assert_eq!(json["results"][0]["correctOptionIndex"], 0);

        // Report-level counters are camelCase on the wire too.
        assert_eq!(json["correctCount"], 1);
        assert_eq!(json["totalCount"], 1);
        assert_eq!(json["descriptiveCount"], 0);
        assert!(json["gradedAt"].is_string());
        assert!(json.get("correct_count").is_none());
    }
}
