//! Domain layer for the Draft Authoring context.

pub mod aggregates;
pub mod commands;
