//! Quizcraft — Draft Authoring bounded context.
//!
//! Builds quizzes and courses one edit at a time. Every edit is a
//! read-modify-write of a single aggregate, serialized per aggregate id, so a
//! draft is never left half-applied in the store.

pub mod application;
pub mod domain;
