//! Domain layer for the Game Session context.

pub mod aggregates;
pub mod commands;
pub mod selector;
