//! The `examforge validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use examforge_core::storage::{load_batch, StoredQuestion};
use examforge_core::validate::validate_batch;

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let json = std::fs::read_to_string(&questions_path)
        .with_context(|| format!("failed to read questions: {}", questions_path.display()))?;
    let records: Vec<StoredQuestion> = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse questions: {}", questions_path.display()))?;
    let questions = load_batch(records)?;

    println!("Batch: {} question(s)", questions.len());

    let (accepted, errors) = validate_batch(questions);
    for error in &errors {
        println!("  WARNING: {error}");
    }

    if errors.is_empty() {
        println!("All questions valid.");
    } else {
        println!("\n{} accepted, {} error(s) found.", accepted.len(), errors.len());
    }

    Ok(())
}
