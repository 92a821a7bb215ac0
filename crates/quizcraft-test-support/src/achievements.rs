//! Test achievement sinks.

use std::sync::Mutex;

use async_trait::async_trait;
use quizcraft_core::achievement::{Achievement, AchievementSink};
use quizcraft_core::error::DomainError;

/// Records every grant as `(achievement, user_id)`.
#[derive(Debug, Default)]
pub struct RecordingAchievements {
    granted: Mutex<Vec<(Achievement, String)>>,
}

impl RecordingAchievements {
    /// Creates a sink with no grants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants received so far, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn granted(&self) -> Vec<(Achievement, String)> {
        self.granted.lock().unwrap().clone()
    }
}

#[async_trait]
impl AchievementSink for RecordingAchievements {
    async fn grant(&self, achievement: Achievement, user_id: &str) -> Result<(), DomainError> {
        self.granted
            .lock()
            .unwrap()
            .push((achievement, user_id.to_owned()));
        Ok(())
    }
}

/// Fails every grant.
#[derive(Debug)]
pub struct FailingAchievements;

#[async_trait]
impl AchievementSink for FailingAchievements {
    async fn grant(&self, _achievement: Achievement, _user_id: &str) -> Result<(), DomainError> {
        Err(DomainError::Persistence("badge service unavailable".into()))
    }
}
