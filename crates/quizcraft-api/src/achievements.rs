//! Achievement sink used by the server binary.

use async_trait::async_trait;
use quizcraft_core::achievement::{Achievement, AchievementSink};
use quizcraft_core::error::DomainError;
use tracing::info;

/// Records grants in the log. Badge delivery belongs to the chat host.
#[derive(Debug, Default)]
pub struct LoggingAchievements;

#[async_trait]
impl AchievementSink for LoggingAchievements {
    async fn grant(&self, achievement: Achievement, user_id: &str) -> Result<(), DomainError> {
        info!(
            achievement = achievement.name(),
            description = achievement.description(),
            user_id,
            "achievement granted"
        );
        Ok(())
    }
}
