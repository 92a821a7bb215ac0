//! Route modules organized by bounded context.

pub mod courses;
pub mod games;
pub mod health;
pub mod quizzes;
