//! Quizcraft Core — shared domain abstractions.
//!
//! This crate defines the entity model shared by the authoring and gameplay
//! contexts, the persistence and achievement ports they talk through, and the
//! determinism seams (clock, RNG). It contains no infrastructure code.

pub mod achievement;
pub mod aggregate;
pub mod clock;
pub mod command;
pub mod course;
pub mod error;
pub mod lock;
pub mod quiz;
pub mod rng;
pub mod store;
