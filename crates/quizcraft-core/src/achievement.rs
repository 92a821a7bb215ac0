//! Achievement signalling port.
//!
//! Badge delivery lives outside the engine. The engine only signals grants
//! and never lets a failed grant reach the player.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::error::DomainError;

/// Achievements the engine can award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// Published a quiz.
    ContentCreator,
    /// Finished a solo game.
    HardWorker,
    /// Top score in a party game.
    Winner,
}

impl Achievement {
    /// Display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::ContentCreator => "Content Creator",
            Self::HardWorker => "Hard Worker",
            Self::Winner => "Winner",
        }
    }

    /// What the user did to earn it.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::ContentCreator => "Create a quiz",
            Self::HardWorker => "Finish a solo game",
            Self::Winner => "Get the highest score in a party game",
        }
    }
}

/// Receives achievement grants.
#[async_trait]
pub trait AchievementSink: Send + Sync {
    /// Grants `achievement` to the user with id `user_id`.
    ///
    /// # Errors
    ///
    /// Implementations may fail; callers go through [`grant_quietly`].
    async fn grant(&self, achievement: Achievement, user_id: &str) -> Result<(), DomainError>;
}

/// Grants an achievement, logging and discarding any failure.
pub async fn grant_quietly(sink: &dyn AchievementSink, achievement: Achievement, user_id: &str) {
    if let Err(err) = sink.grant(achievement, user_id).await {
        warn!(
            achievement = achievement.name(),
            user_id,
            error = %err,
            "failed to grant achievement"
        );
    }
}
