//! Query handlers for the Draft Authoring context.
//!
//! Read-only views for the transport layer. Queries never take the aggregate
//! lock; they see the last persisted state.

use chrono::{DateTime, Utc};
use quizcraft_core::aggregate::{self, Aggregate, Catalog};
use quizcraft_core::course::{Course, Lesson, ResourceType};
use quizcraft_core::error::DomainError;
use quizcraft_core::quiz::{Quiz, QuizType};
use quizcraft_core::store::KeyValueStore;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// One question as shown on the review screen.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub question_id: Uuid,
    pub text: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    /// Whether the question is playable under the quiz's current type.
    pub valid: bool,
}

/// Read-only view of a quiz draft.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub quiz_id: Uuid,
    pub name: String,
    pub quiz_type: Option<QuizType>,
    pub questions: Vec<QuestionView>,
    pub valid_question_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&Quiz> for QuizView {
    fn from(quiz: &Quiz) -> Self {
        Self {
            quiz_id: quiz.id,
            name: quiz.name.clone(),
            quiz_type: quiz.quiz_type,
            questions: quiz
                .questions
                .iter()
                .map(|question| QuestionView {
                    question_id: question.id,
                    text: question.text.clone(),
                    correct_answer: question.correct_answer.clone(),
                    incorrect_answers: question.incorrect_answers.clone(),
                    valid: question.is_valid_for(quiz.quiz_type),
                })
                .collect(),
            valid_question_count: quiz.valid_question_count(),
            updated_at: quiz.updated_at,
        }
    }
}

/// Catalog entry for a published quiz.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub quiz_id: Uuid,
    pub name: String,
    pub quiz_type: Option<QuizType>,
    pub valid_question_count: usize,
}

/// One resource within a lesson view.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    /// Position within the lesson, as accepted by resource removal.
    pub index: usize,
    pub name: String,
    pub resource_type: ResourceType,
    pub content: String,
    pub pretext: String,
}

/// Read-only view of one lesson.
#[derive(Debug, Clone, Serialize)]
pub struct LessonView {
    /// Position within the course, as accepted by lesson edits.
    pub index: usize,
    pub name: String,
    pub introduction: String,
    pub resources: Vec<ResourceView>,
}

impl LessonView {
    /// Builds the view of `lesson`, found at position `index`.
    #[must_use]
    pub fn new(index: usize, lesson: &Lesson) -> Self {
        Self {
            index,
            name: lesson.name.clone(),
            introduction: lesson.introduction.clone(),
            resources: lesson
                .resources
                .iter()
                .enumerate()
                .map(|(index, resource)| ResourceView {
                    index,
                    name: resource.name.clone(),
                    resource_type: resource.resource_type,
                    content: resource.content.clone(),
                    pretext: resource.pretext.clone(),
                })
                .collect(),
        }
    }
}

/// Lesson line in a course view.
#[derive(Debug, Clone, Serialize)]
pub struct LessonSummary {
    pub index: usize,
    pub name: String,
    pub resource_count: usize,
}

/// Read-only view of a course draft.
#[derive(Debug, Clone, Serialize)]
pub struct CourseView {
    pub course_id: Uuid,
    pub name: String,
    pub description: String,
    pub lessons: Vec<LessonSummary>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            course_id: course.id,
            name: course.name.clone(),
            description: course.description.clone(),
            lessons: course
                .lessons
                .iter()
                .enumerate()
                .map(|(index, lesson)| LessonSummary {
                    index,
                    name: lesson.name.clone(),
                    resource_count: lesson.resources.len(),
                })
                .collect(),
            updated_at: course.updated_at,
        }
    }
}

/// Catalog entry for a published course.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub course_id: Uuid,
    pub name: String,
    pub description: String,
    pub lesson_count: usize,
}

/// Resolves a catalog into its stored aggregates, skipping ids that are
/// malformed, missing, or unreadable.
async fn load_catalog<A: Aggregate>(
    catalog: Catalog,
    store: &dyn KeyValueStore,
) -> Result<Vec<A>, DomainError> {
    let members = store.list_members(catalog.list_key()).await?;
    let mut aggregates = Vec::with_capacity(members.len());
    for member in members {
        let Ok(id) = Uuid::parse_str(&member) else {
            debug!(list = catalog.list_key(), %member, "skipping malformed catalog id");
            continue;
        };
        match aggregate::load::<A>(store, id).await {
            Ok(Some(found)) => aggregates.push(found),
            Ok(None) => debug!(list = catalog.list_key(), %id, "skipping missing catalog entry"),
            Err(err) => {
                debug!(list = catalog.list_key(), %id, error = %err, "skipping unreadable catalog entry");
            }
        }
    }
    Ok(aggregates)
}

/// Retrieves a quiz with per-question validity flags.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the quiz does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn get_quiz(quiz_id: Uuid, store: &dyn KeyValueStore) -> Result<QuizView, DomainError> {
    let quiz: Quiz = aggregate::load_existing(store, quiz_id).await?;
    Ok(QuizView::from(&quiz))
}

/// Lists published quizzes in publication order.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the catalog cannot be read.
pub async fn list_available_quizzes(
    store: &dyn KeyValueStore,
) -> Result<Vec<QuizSummary>, DomainError> {
    let quizzes: Vec<Quiz> = load_catalog(Catalog::Quizzes, store).await?;
    Ok(quizzes
        .iter()
        .map(|quiz| QuizSummary {
            quiz_id: quiz.id,
            name: quiz.name.clone(),
            quiz_type: quiz.quiz_type,
            valid_question_count: quiz.valid_question_count(),
        })
        .collect())
}

/// Retrieves a course with its lesson outline.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the course does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn get_course(
    course_id: Uuid,
    store: &dyn KeyValueStore,
) -> Result<CourseView, DomainError> {
    let course: Course = aggregate::load_existing(store, course_id).await?;
    Ok(CourseView::from(&course))
}

/// Retrieves one lesson of a course by position.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the course does not exist,
/// `DomainError::LessonNotFound` if the index does not resolve, or
/// `DomainError::Persistence` if the store fails.
pub async fn get_lesson(
    course_id: Uuid,
    index: usize,
    store: &dyn KeyValueStore,
) -> Result<LessonView, DomainError> {
    let course: Course = aggregate::load_existing(store, course_id).await?;
    Ok(LessonView::new(index, course.lesson(index)?))
}

/// Lists published courses in publication order.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the catalog cannot be read.
pub async fn list_available_courses(
    store: &dyn KeyValueStore,
) -> Result<Vec<CourseSummary>, DomainError> {
    let courses: Vec<Course> = load_catalog(Catalog::Courses, store).await?;
    Ok(courses
        .iter()
        .map(|course| CourseSummary {
            course_id: course.id,
            name: course.name.clone(),
            description: course.description.clone(),
            lesson_count: course.lessons.len(),
        })
        .collect())
}
