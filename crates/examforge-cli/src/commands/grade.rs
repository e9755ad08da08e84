//! The `examforge grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examforge_core::grade::{grade_submission, Submission};
use examforge_core::report::GradingReport;
use examforge_core::storage::{load_batch, StoredQuestion};

pub fn execute(questions_path: PathBuf, answers_path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let questions_json = std::fs::read_to_string(&questions_path)
        .with_context(|| format!("failed to read questions: {}", questions_path.display()))?;
    let records: Vec<StoredQuestion> = serde_json::from_str(&questions_json)
        .with_context(|| format!("failed to parse questions: {}", questions_path.display()))?;
    let questions = load_batch(records)?;

    let answers_json = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers: {}", answers_path.display()))?;
    let submission: Submission = serde_json::from_str(&answers_json)
        .with_context(|| format!("failed to parse answers: {}", answers_path.display()))?;

    let report = grade_submission(&questions, &submission);
    print_summary(&report);

    if let Some(path) = output {
        report.save_json(&path)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &GradingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Question", "Result"]);

    for (i, result) in report.results.iter().enumerate() {
        let verdict = if result.is_descriptive() {
            "manual review"
        } else if result.is_correct() {
            "correct"
        } else {
            "incorrect"
        };

        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(result.question_type()),
            Cell::new(truncate(result.question_text(), 48)),
            Cell::new(verdict),
        ]);
    }

    println!("{table}");
    println!(
        "\nScore: {:.2} ({}/{} correct, {} descriptive)",
        report.score, report.correct_count, report.total_count, report.descriptive_count
    );
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
