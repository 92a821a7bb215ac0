//! Application layer for the Draft Authoring context.

pub mod command_handlers;
pub mod query_handlers;
