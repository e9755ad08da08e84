//! The `examforge extract` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examforge_core::extract::extract_questions;
use examforge_core::storage::store_batch;

pub fn execute(input: PathBuf, output: PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("failed to read response file: {}", input.display()))?;

    let outcome = extract_questions(&raw)
        .with_context(|| format!("failed to extract questions from {}", input.display()))?;

    println!("Accepted {} question(s)", outcome.questions.len());

    if !outcome.invalid_questions.is_empty() {
        println!(
            "{} question(s) reported invalid by the model:",
            outcome.invalid_questions.len()
        );
        for invalid in &outcome.invalid_questions {
            let number = invalid.question_number.as_deref().unwrap_or("?");
            println!("  [{number}] {}", invalid.reason);
        }
    }

    for error in &outcome.errors {
        println!("  WARNING: {error}");
    }

    let records = store_batch(&outcome.questions);
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(&output, json)
        .with_context(|| format!("failed to write questions to {}", output.display()))?;

    println!("Wrote {}", output.display());
    Ok(())
}
