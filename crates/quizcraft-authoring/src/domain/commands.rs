//! Commands for the Draft Authoring context.

use quizcraft_core::command::Command;
use quizcraft_core::quiz::QuizType;
use uuid::Uuid;

use super::aggregates::NewResource;

/// Command to start an empty quiz draft.
#[derive(Debug, Clone)]
pub struct CreateQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for CreateQuiz {
    fn command_type(&self) -> &'static str {
        "authoring.create_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to set a quiz's name.
#[derive(Debug, Clone)]
pub struct RenameQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz identifier.
    pub quiz_id: Uuid,
    /// The new name, untrimmed.
    pub name: String,
}

impl Command for RenameQuiz {
    fn command_type(&self) -> &'static str {
        "authoring.rename_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to set a quiz's answering mode.
#[derive(Debug, Clone)]
pub struct SetQuizType {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz identifier.
    pub quiz_id: Uuid,
    /// The new quiz type.
    pub quiz_type: QuizType,
}

impl Command for SetQuizType {
    fn command_type(&self) -> &'static str {
        "authoring.set_quiz_type"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to append a question to a quiz.
#[derive(Debug, Clone)]
pub struct AddQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz identifier.
    pub quiz_id: Uuid,
    /// The question text.
    pub text: String,
    /// The correct answer.
    pub correct_answer: String,
    /// Decoy answers; blanks are dropped.
    pub incorrect_answers: Vec<String>,
}

impl Command for AddQuestion {
    fn command_type(&self) -> &'static str {
        "authoring.add_question"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to remove a batch of questions by id.
#[derive(Debug, Clone)]
pub struct RemoveQuestions {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz identifier.
    pub quiz_id: Uuid,
    /// Ids to remove; unknown ids are ignored.
    pub question_ids: Vec<Uuid>,
}

impl Command for RemoveQuestions {
    fn command_type(&self) -> &'static str {
        "authoring.remove_questions"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to list a quiz in the catalog.
#[derive(Debug, Clone)]
pub struct PublishQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz identifier.
    pub quiz_id: Uuid,
    /// The publishing user, credited with the achievement.
    pub user_id: String,
}

impl Command for PublishQuiz {
    fn command_type(&self) -> &'static str {
        "authoring.publish_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a quiz and unlist it.
#[derive(Debug, Clone)]
pub struct DiscardQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz identifier.
    pub quiz_id: Uuid,
}

impl Command for DiscardQuiz {
    fn command_type(&self) -> &'static str {
        "authoring.discard_quiz"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to start an empty course draft.
#[derive(Debug, Clone)]
pub struct CreateCourse {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for CreateCourse {
    fn command_type(&self) -> &'static str {
        "authoring.create_course"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to set a course's name.
#[derive(Debug, Clone)]
pub struct RenameCourse {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
    /// The new name, untrimmed.
    pub name: String,
}

impl Command for RenameCourse {
    fn command_type(&self) -> &'static str {
        "authoring.rename_course"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to set a course's description.
#[derive(Debug, Clone)]
pub struct DescribeCourse {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
    /// The new description, untrimmed.
    pub description: String,
}

impl Command for DescribeCourse {
    fn command_type(&self) -> &'static str {
        "authoring.describe_course"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to append a lesson to a course.
#[derive(Debug, Clone)]
pub struct AddLesson {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
    /// The lesson name.
    pub name: String,
    /// The lesson introduction.
    pub introduction: String,
}

impl Command for AddLesson {
    fn command_type(&self) -> &'static str {
        "authoring.add_lesson"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to rename a lesson.
#[derive(Debug, Clone)]
pub struct RenameLesson {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
    /// Position of the lesson, resolved at apply time.
    pub lesson_index: usize,
    /// The new lesson name.
    pub name: String,
}

impl Command for RenameLesson {
    fn command_type(&self) -> &'static str {
        "authoring.rename_lesson"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to replace a lesson's introduction.
#[derive(Debug, Clone)]
pub struct SetLessonIntroduction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
    /// Position of the lesson, resolved at apply time.
    pub lesson_index: usize,
    /// The new introduction.
    pub introduction: String,
}

impl Command for SetLessonIntroduction {
    fn command_type(&self) -> &'static str {
        "authoring.set_lesson_introduction"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a lesson.
#[derive(Debug, Clone)]
pub struct DeleteLesson {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
    /// Position of the lesson, resolved at apply time.
    pub lesson_index: usize,
}

impl Command for DeleteLesson {
    fn command_type(&self) -> &'static str {
        "authoring.delete_lesson"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to append a resource to a lesson.
#[derive(Debug, Clone)]
pub struct AddResource {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
    /// Position of the lesson, resolved at apply time.
    pub lesson_index: usize,
    /// The resource to add.
    pub resource: NewResource,
}

impl Command for AddResource {
    fn command_type(&self) -> &'static str {
        "authoring.add_resource"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to remove a batch of resources from a lesson.
#[derive(Debug, Clone)]
pub struct RemoveResources {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
    /// Position of the lesson, resolved at apply time.
    pub lesson_index: usize,
    /// Resource positions, relative to the list before removal.
    pub positions: Vec<usize>,
}

impl Command for RemoveResources {
    fn command_type(&self) -> &'static str {
        "authoring.remove_resources"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to list a course in the catalog.
#[derive(Debug, Clone)]
pub struct PublishCourse {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
}

impl Command for PublishCourse {
    fn command_type(&self) -> &'static str {
        "authoring.publish_course"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to delete a course and unlist it.
#[derive(Debug, Clone)]
pub struct DiscardCourse {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The course identifier.
    pub course_id: Uuid,
}

impl Command for DiscardCourse {
    fn command_type(&self) -> &'static str {
        "authoring.discard_course"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
