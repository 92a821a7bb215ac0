//! Quizcraft — Game Session bounded context.
//!
//! Runs quiz sessions: question sequencing, per-player answer deduplication,
//! scoring, shuffled multiple-choice options and completion.

pub mod application;
pub mod domain;
