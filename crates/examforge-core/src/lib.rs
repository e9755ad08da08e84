//! examforge-core — Exam question normalization and grading engine.
//!
//! This crate turns raw language-model output describing an exam into a
//! canonical set of typed question records, and grades submitted answers
//! against them. The pipeline runs strictly forward:
//! normalize → canonicalize → validate → (later) grade.

pub mod canonical;
pub mod config;
pub mod error;
pub mod extract;
pub mod grade;
pub mod model;
pub mod normalize;
pub mod report;
pub mod storage;
pub mod traits;
pub mod validate;
