use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examforge_core::canonical::{remove_embedded_options, strip_option_label};
use examforge_core::extract::extract_questions;

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonicalize");

    group.bench_function("strip_letter_label", |b| {
        b.iter(|| strip_option_label(black_box("C) the mitochondria is the powerhouse")))
    });

    group.bench_function("strip_no_label", |b| {
        b.iter(|| strip_option_label(black_box("the mitochondria is the powerhouse")))
    });

    let with_run = "What is the capital of France? (1) Paris 2) Lyon 3) Nice 4) Lille)";
    let without_run = "Newton's second law (F = ma) relates force to what?";

    group.bench_function("remove_option_run", |b| {
        b.iter(|| remove_embedded_options(black_box(with_run)))
    });

    group.bench_function("remove_noop", |b| {
        b.iter(|| remove_embedded_options(black_box(without_run)))
    });

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    let small = generate_response(5);
    let medium = generate_response(50);
    let large = generate_response(200);

    group.bench_function("5_questions", |b| {
        b.iter(|| extract_questions(black_box(&small)))
    });
    group.bench_function("50_questions", |b| {
        b.iter(|| extract_questions(black_box(&medium)))
    });
    group.bench_function("200_questions", |b| {
        b.iter(|| extract_questions(black_box(&large)))
    });

    group.finish();
}

fn generate_response(n: usize) -> String {
    let mut questions = Vec::with_capacity(n);
    for i in 0..n {
        questions.push(format!(
            r#"{{
  "questionType": "multiple_choice",
  "questionText": "Question {i}? (A. one B. two C. three D. four)",
  "answerProvided": true,
  "options": ["A. one", "B. two", "C. three", "D. four"],
  "correctOptionIndex": {idx}
}}"#,
            idx = i % 4
        ));
    }
    format!(
        "```json\n{{\"questions\": [{}]}}\n```",
        questions.join(",\n")
    )
}

criterion_group!(benches, bench_canonicalize, bench_extract);
criterion_main!(benches);
