//! Commands for the Game Session context.

use quizcraft_core::command::Command;
use uuid::Uuid;

use super::aggregates::{AnswerPayload, GameType, ScoringType};

/// Command to start a game over a quiz.
#[derive(Debug, Clone)]
pub struct StartGame {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz to play.
    pub quiz_id: Uuid,
    /// User id of the game master.
    pub gm_user_id: String,
    pub game_type: GameType,
    pub scoring_type: ScoringType,
    /// Requested number of questions; out-of-range means all valid ones.
    pub question_count: i64,
    /// Post that anchors the session, if the transport already created one.
    pub root_post_id: Option<String>,
}

impl Command for StartGame {
    fn command_type(&self) -> &'static str {
        "gameplay.start_game"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to answer the current question.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub game_id: Uuid,
    /// The question the player saw.
    pub question_id: Uuid,
    pub user_id: String,
    /// Name shown on the score table.
    pub username: String,
    pub answer: AnswerPayload,
}

impl Command for SubmitAnswer {
    fn command_type(&self) -> &'static str {
        "gameplay.submit_answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to force the game to its next question. GM only.
#[derive(Debug, Clone)]
pub struct NextQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub game_id: Uuid,
    /// The question the GM saw when pressing "next".
    pub question_id: Uuid,
    pub user_id: String,
}

impl Command for NextQuestion {
    fn command_type(&self) -> &'static str {
        "gameplay.next_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to record the post now showing the game.
#[derive(Debug, Clone)]
pub struct AttachPost {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub game_id: Uuid,
    pub post_id: String,
}

impl Command for AttachPost {
    fn command_type(&self) -> &'static str {
        "gameplay.attach_post"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
