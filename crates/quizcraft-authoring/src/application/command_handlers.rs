//! Command handlers for the Draft Authoring context.
//!
//! Every handler that edits an existing draft follows the same steps: take
//! the aggregate lock, load, apply one edit, stamp `updated_at`, persist.
//! Validation failures return before anything is written.

use std::collections::HashSet;

use quizcraft_core::achievement::{Achievement, AchievementSink, grant_quietly};
use quizcraft_core::aggregate::{self, Aggregate, Catalog};
use quizcraft_core::clock::Clock;
use quizcraft_core::course::{Course, ResourceType};
use quizcraft_core::error::DomainError;
use quizcraft_core::lock::AggregateLocks;
use quizcraft_core::quiz::Quiz;
use quizcraft_core::store::KeyValueStore;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::aggregates::{CourseDraft, QuizDraft, parse_quiz_reference, require_text};
use crate::domain::commands::{
    AddLesson, AddQuestion, AddResource, CreateCourse, CreateQuiz, DeleteLesson, DescribeCourse,
    DiscardCourse, DiscardQuiz, PublishCourse, PublishQuiz, RemoveQuestions, RemoveResources,
    RenameCourse, RenameLesson, RenameQuiz, SetLessonIntroduction, SetQuizType,
};

/// Result of appending a question.
#[derive(Debug)]
pub struct QuestionAdded {
    /// The quiz after the edit.
    pub quiz: Quiz,
    /// Id assigned to the new question.
    pub question_id: Uuid,
}

/// Result of a batch question removal.
#[derive(Debug)]
pub struct QuestionsRemoved {
    /// The quiz after the edit.
    pub quiz: Quiz,
    /// How many questions were actually removed.
    pub removed: usize,
}

/// Result of a publish command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishOutcome {
    /// The published aggregate.
    pub id: Uuid,
    /// `false` when the aggregate was already in the catalog.
    pub newly_listed: bool,
}

async fn edit_quiz<T, F>(
    quiz_id: Uuid,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
    apply: F,
) -> Result<(Quiz, T), DomainError>
where
    T: Send,
    F: FnOnce(&mut QuizDraft) -> Result<T, DomainError> + Send,
{
    let _guard = locks.acquire(&Quiz::storage_key(quiz_id)).await;
    let mut draft = QuizDraft::from_quiz(aggregate::load_existing(store, quiz_id).await?);

    let outcome = apply(&mut draft)?;
    draft.touch(clock.now());

    aggregate::save(store, draft.quiz()).await?;
    Ok((draft.into_quiz(), outcome))
}

async fn edit_course<T, F>(
    course_id: Uuid,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
    apply: F,
) -> Result<(Course, T), DomainError>
where
    T: Send,
    F: FnOnce(&mut CourseDraft) -> Result<T, DomainError> + Send,
{
    let _guard = locks.acquire(&Course::storage_key(course_id)).await;
    let mut draft = CourseDraft::from_course(aggregate::load_existing(store, course_id).await?);

    let outcome = apply(&mut draft)?;
    draft.touch(clock.now());

    aggregate::save(store, draft.course()).await?;
    Ok((draft.into_course(), outcome))
}

async fn list(
    catalog: Catalog,
    id: Uuid,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<bool, DomainError> {
    let _guard = locks.acquire(catalog.list_key()).await;
    store.add_to_list(catalog.list_key(), &id.to_string()).await
}

async fn unlist(
    catalog: Catalog,
    id: Uuid,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<bool, DomainError> {
    let _guard = locks.acquire(catalog.list_key()).await;
    store
        .remove_from_list(catalog.list_key(), &id.to_string())
        .await
}

// --- quizzes ---

/// Handles the `CreateQuiz` command: persists an empty draft under a fresh
/// id. The draft is not listed in the catalog.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the store fails.
pub async fn handle_create_quiz(
    command: &CreateQuiz,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Quiz, DomainError> {
    let draft = QuizDraft::create(Uuid::new_v4(), clock.now());
    aggregate::save(store, draft.quiz()).await?;
    info!(
        correlation_id = %command.correlation_id,
        quiz_id = %draft.quiz().id,
        "quiz draft created"
    );
    Ok(draft.into_quiz())
}

/// Handles the `RenameQuiz` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is blank (checked before the
/// quiz is loaded), `DomainError::NotFound` if the quiz does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_rename_quiz(
    command: &RenameQuiz,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Quiz, DomainError> {
    let name = require_text("name", &command.name)?;
    let (quiz, ()) = edit_quiz(command.quiz_id, clock, locks, store, |draft| {
        draft.rename(name);
        Ok(())
    })
    .await?;
    debug!(quiz_id = %quiz.id, "quiz renamed");
    Ok(quiz)
}

/// Handles the `SetQuizType` command. Questions that become invalid are
/// kept.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the quiz does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_set_quiz_type(
    command: &SetQuizType,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Quiz, DomainError> {
    let quiz_type = command.quiz_type;
    let (quiz, ()) = edit_quiz(command.quiz_id, clock, locks, store, |draft| {
        draft.set_type(quiz_type);
        Ok(())
    })
    .await?;
    debug!(
        quiz_id = %quiz.id,
        quiz_type = %quiz_type,
        valid_questions = quiz.valid_question_count(),
        "quiz type set"
    );
    Ok(quiz)
}

/// Handles the `AddQuestion` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the question is incomplete for the
/// quiz's current type, `DomainError::NotFound` if the quiz does not exist,
/// or `DomainError::Persistence` if the store fails.
pub async fn handle_add_question(
    command: &AddQuestion,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<QuestionAdded, DomainError> {
    let (quiz, question_id) = edit_quiz(command.quiz_id, clock, locks, store, |draft| {
        draft.add_question(
            &command.text,
            &command.correct_answer,
            &command.incorrect_answers,
        )
    })
    .await?;
    debug!(quiz_id = %quiz.id, %question_id, "question added");
    Ok(QuestionAdded { quiz, question_id })
}

/// Handles the `RemoveQuestions` command. Unknown ids are ignored, so
/// repeating a removal succeeds.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the quiz does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_remove_questions(
    command: &RemoveQuestions,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<QuestionsRemoved, DomainError> {
    let ids: HashSet<Uuid> = command.question_ids.iter().copied().collect();
    let (quiz, removed) = edit_quiz(command.quiz_id, clock, locks, store, |draft| {
        Ok(draft.remove_questions(&ids))
    })
    .await?;
    debug!(quiz_id = %quiz.id, removed, "questions removed");
    Ok(QuestionsRemoved { quiz, removed })
}

/// Handles the `PublishQuiz` command: lists the quiz in the catalog and
/// credits the publisher with the content-creator achievement. Publishing an
/// already listed quiz changes nothing.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the quiz has no name or no valid
/// question, `DomainError::NotFound` if it does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_publish_quiz(
    command: &PublishQuiz,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
    achievements: &dyn AchievementSink,
) -> Result<PublishOutcome, DomainError> {
    let _guard = locks.acquire(&Quiz::storage_key(command.quiz_id)).await;
    let quiz: Quiz = aggregate::load_existing(store, command.quiz_id).await?;
    QuizDraft::from_quiz(quiz).ensure_publishable()?;

    let newly_listed = list(Catalog::Quizzes, command.quiz_id, locks, store).await?;
    if newly_listed {
        info!(
            correlation_id = %command.correlation_id,
            quiz_id = %command.quiz_id,
            "quiz published"
        );
        grant_quietly(achievements, Achievement::ContentCreator, &command.user_id).await;
    } else {
        debug!(quiz_id = %command.quiz_id, "quiz already published");
    }

    Ok(PublishOutcome {
        id: command.quiz_id,
        newly_listed,
    })
}

/// Handles the `DiscardQuiz` command: deletes the quiz and unlists it.
/// Discarding a missing quiz succeeds.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the store fails.
pub async fn handle_discard_quiz(
    command: &DiscardQuiz,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<(), DomainError> {
    let _guard = locks.acquire(&Quiz::storage_key(command.quiz_id)).await;
    aggregate::delete::<Quiz>(store, command.quiz_id).await?;
    let was_listed = unlist(Catalog::Quizzes, command.quiz_id, locks, store).await?;
    info!(
        correlation_id = %command.correlation_id,
        quiz_id = %command.quiz_id,
        was_listed,
        "quiz discarded"
    );
    Ok(())
}

// --- courses ---

/// Handles the `CreateCourse` command: persists an empty draft under a fresh
/// id.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the store fails.
pub async fn handle_create_course(
    command: &CreateCourse,
    clock: &dyn Clock,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    let draft = CourseDraft::create(Uuid::new_v4(), clock.now());
    aggregate::save(store, draft.course()).await?;
    info!(
        correlation_id = %command.correlation_id,
        course_id = %draft.course().id,
        "course draft created"
    );
    Ok(draft.into_course())
}

/// Handles the `RenameCourse` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is blank,
/// `DomainError::NotFound` if the course does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_rename_course(
    command: &RenameCourse,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    let name = require_text("name", &command.name)?;
    let (course, ()) = edit_course(command.course_id, clock, locks, store, |draft| {
        draft.rename(name);
        Ok(())
    })
    .await?;
    Ok(course)
}

/// Handles the `DescribeCourse` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the description is blank,
/// `DomainError::NotFound` if the course does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_describe_course(
    command: &DescribeCourse,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    let description = require_text("description", &command.description)?;
    let (course, ()) = edit_course(command.course_id, clock, locks, store, |draft| {
        draft.describe(description);
        Ok(())
    })
    .await?;
    Ok(course)
}

/// Handles the `AddLesson` command.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name or introduction is blank,
/// `DomainError::NotFound` if the course does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_add_lesson(
    command: &AddLesson,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    let (course, index) = edit_course(command.course_id, clock, locks, store, |draft| {
        draft.add_lesson(&command.name, &command.introduction)
    })
    .await?;
    debug!(course_id = %course.id, lesson_index = index, "lesson added");
    Ok(course)
}

/// Handles the `RenameLesson` command. The index is resolved against the
/// lessons as they are when the lock is held.
///
/// # Errors
///
/// Returns `DomainError::LessonNotFound` if the index no longer resolves,
/// `DomainError::Validation` if the name is blank, `DomainError::NotFound`
/// if the course does not exist, or `DomainError::Persistence` if the store
/// fails.
pub async fn handle_rename_lesson(
    command: &RenameLesson,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    let (course, lesson_id) = edit_course(command.course_id, clock, locks, store, |draft| {
        draft.rename_lesson(command.lesson_index, &command.name)
    })
    .await?;
    debug!(course_id = %course.id, %lesson_id, "lesson renamed");
    Ok(course)
}

/// Handles the `SetLessonIntroduction` command.
///
/// # Errors
///
/// Returns `DomainError::LessonNotFound` if the index no longer resolves,
/// `DomainError::Validation` if the introduction is blank,
/// `DomainError::NotFound` if the course does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_set_lesson_introduction(
    command: &SetLessonIntroduction,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    let (course, lesson_id) = edit_course(command.course_id, clock, locks, store, |draft| {
        draft.set_lesson_introduction(command.lesson_index, &command.introduction)
    })
    .await?;
    debug!(course_id = %course.id, %lesson_id, "lesson introduction set");
    Ok(course)
}

/// Handles the `DeleteLesson` command.
///
/// # Errors
///
/// Returns `DomainError::LessonNotFound` if the index no longer resolves,
/// `DomainError::NotFound` if the course does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_delete_lesson(
    command: &DeleteLesson,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    let (course, lesson) = edit_course(command.course_id, clock, locks, store, |draft| {
        draft.delete_lesson(command.lesson_index)
    })
    .await?;
    debug!(course_id = %course.id, lesson_id = %lesson.id, "lesson deleted");
    Ok(course)
}

/// Handles the `AddResource` command. A quiz resource must reference a quiz
/// that exists; the course does not take ownership of it.
///
/// # Errors
///
/// Returns `DomainError::Validation` for incomplete input,
/// `DomainError::NotFound` if the course or the referenced quiz does not
/// exist, `DomainError::LessonNotFound` if the index no longer resolves, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_add_resource(
    command: &AddResource,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    if command.resource.resource_type == ResourceType::Quiz {
        let quiz_id = parse_quiz_reference(&command.resource.content)?;
        aggregate::load_existing::<Quiz>(store, quiz_id).await?;
    }

    let resource = command.resource.clone();
    let (course, position) = edit_course(command.course_id, clock, locks, store, |draft| {
        draft.add_resource(command.lesson_index, resource)
    })
    .await?;
    debug!(
        course_id = %course.id,
        lesson_index = command.lesson_index,
        position,
        "resource added"
    );
    Ok(course)
}

/// Handles the `RemoveResources` command. Positions past the end of the
/// lesson are ignored.
///
/// # Errors
///
/// Returns `DomainError::LessonNotFound` if the index no longer resolves,
/// `DomainError::NotFound` if the course does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_remove_resources(
    command: &RemoveResources,
    clock: &dyn Clock,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<Course, DomainError> {
    let (course, removed) = edit_course(command.course_id, clock, locks, store, |draft| {
        draft.remove_resources(command.lesson_index, &command.positions)
    })
    .await?;
    debug!(course_id = %course.id, removed, "resources removed");
    Ok(course)
}

/// Handles the `PublishCourse` command. Publishing an already listed course
/// changes nothing.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the course has no name or no lesson,
/// `DomainError::NotFound` if it does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_publish_course(
    command: &PublishCourse,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<PublishOutcome, DomainError> {
    let _guard = locks.acquire(&Course::storage_key(command.course_id)).await;
    let course: Course = aggregate::load_existing(store, command.course_id).await?;
    CourseDraft::from_course(course).ensure_publishable()?;

    let newly_listed = list(Catalog::Courses, command.course_id, locks, store).await?;
    if newly_listed {
        info!(
            correlation_id = %command.correlation_id,
            course_id = %command.course_id,
            "course published"
        );
    }

    Ok(PublishOutcome {
        id: command.course_id,
        newly_listed,
    })
}

/// Handles the `DiscardCourse` command: deletes the course and unlists it.
///
/// # Errors
///
/// Returns `DomainError::Persistence` if the store fails.
pub async fn handle_discard_course(
    command: &DiscardCourse,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<(), DomainError> {
    let _guard = locks.acquire(&Course::storage_key(command.course_id)).await;
    aggregate::delete::<Course>(store, command.course_id).await?;
    let was_listed = unlist(Catalog::Courses, command.course_id, locks, store).await?;
    info!(
        correlation_id = %command.correlation_id,
        course_id = %command.course_id,
        was_listed,
        "course discarded"
    );
    Ok(())
}
