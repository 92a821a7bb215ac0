//! Command abstractions.

use uuid::Uuid;

/// Trait that every authoring and gameplay command implements.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted command name, e.g. `authoring.add_question`, used in logs.
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;
}
