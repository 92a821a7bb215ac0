//! Shared application state.

use std::sync::{Arc, Mutex};

use quizcraft_core::achievement::AchievementSink;
use quizcraft_core::clock::Clock;
use quizcraft_core::lock::AggregateLocks;
use quizcraft_core::rng::DeterministicRng;
use quizcraft_core::store::KeyValueStore;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway.
    pub store: Arc<dyn KeyValueStore>,
    /// Per-aggregate locks serializing read-modify-write cycles.
    pub locks: Arc<AggregateLocks>,
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock>,
    /// RNG for question order and answer shuffling.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Receives achievement grants.
    pub achievements: Arc<dyn AchievementSink>,
}

impl AppState {
    /// Create new application state with a fresh lock registry.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        achievements: Arc<dyn AchievementSink>,
    ) -> Self {
        Self {
            store,
            locks: Arc::new(AggregateLocks::new()),
            clock,
            rng,
            achievements,
        }
    }
}
