//! Shared test doubles for the Quizcraft trivia engine.

mod achievements;
mod clock;
mod rng;
mod store;

pub use achievements::{FailingAchievements, RecordingAchievements};
pub use clock::FixedClock;
pub use rng::{MockRng, SequenceRng};
pub use store::{FailingStore, RecordingStore};
