//! examforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examforge", version, about = "Exam question extraction and grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract canonical questions from a saved model response
    Extract {
        /// Raw model response text file
        #[arg(long)]
        input: PathBuf,

        /// Where to write the extracted question batch
        #[arg(long, default_value = "questions.json")]
        output: PathBuf,
    },

    /// Grade a submission against an extracted question batch
    Grade {
        /// Question batch JSON (as written by `extract`)
        #[arg(long)]
        questions: PathBuf,

        /// Submitted answers JSON (question id -> raw answer value)
        #[arg(long)]
        answers: PathBuf,

        /// Optional path to write the full grading report
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Re-validate a stored question batch
    Validate {
        /// Question batch JSON
        #[arg(long)]
        questions: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("examforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { input, output } => commands::extract::execute(input, output),
        Commands::Grade {
            questions,
            answers,
            output,
        } => commands::grade::execute(questions, answers, output),
        Commands::Validate { questions } => commands::validate::execute(questions),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
