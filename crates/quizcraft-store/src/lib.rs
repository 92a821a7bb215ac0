//! Quizcraft Store — persistence gateway adapters.
//!
//! [`MemoryStore`] keeps everything in process memory and backs tests and
//! single-node deployments. [`PgStore`] persists to PostgreSQL.

pub mod memory;
pub mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;
