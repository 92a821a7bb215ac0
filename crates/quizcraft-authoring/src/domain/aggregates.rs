//! Aggregate roots for the Draft Authoring context.
//!
//! [`QuizDraft`] and [`CourseDraft`] wrap the shared entity model and own
//! every edit rule. Each method applies one edit in memory; persisting the
//! result is the command handler's job.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use quizcraft_core::course::{Course, Lesson, Resource, ResourceType};
use quizcraft_core::error::DomainError;
use quizcraft_core::quiz::{INCORRECT_ANSWER_COUNT, Question, Quiz, QuizType};
use uuid::Uuid;

/// Trims `value`, rejecting input that is empty after trimming.
///
/// # Errors
///
/// Returns `DomainError::Validation` against `field` if `value` is blank.
pub fn require_text(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_owned())
}

/// A quiz under construction.
#[derive(Debug, Clone)]
pub struct QuizDraft {
    quiz: Quiz,
}

impl QuizDraft {
    /// Starts an empty draft.
    #[must_use]
    pub fn create(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            quiz: Quiz::new(id, now),
        }
    }

    /// Wraps a stored quiz for editing.
    #[must_use]
    pub fn from_quiz(quiz: Quiz) -> Self {
        Self { quiz }
    }

    /// The quiz in its current state.
    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Unwraps the edited quiz.
    #[must_use]
    pub fn into_quiz(self) -> Quiz {
        self.quiz
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.quiz.updated_at = now;
    }

    /// Sets the quiz name. `name` must already be validated with
    /// [`require_text`].
    pub fn rename(&mut self, name: String) {
        self.quiz.name = name;
    }

    /// Changes the quiz type. Existing questions are kept even when the new
    /// type makes them unplayable.
    pub fn set_type(&mut self, quiz_type: QuizType) {
        self.quiz.quiz_type = Some(quiz_type);
    }

    /// Appends a question and returns its new id.
    ///
    /// Blank incorrect answers are dropped. All remaining ones are kept, even
    /// for a single-answer quiz, so a later switch to multiple choice can
    /// make the question playable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `text` or `correct_answer` is
    /// blank, or if the quiz is multiple choice and fewer than
    /// [`INCORRECT_ANSWER_COUNT`] non-blank incorrect answers are given.
    pub fn add_question(
        &mut self,
        text: &str,
        correct_answer: &str,
        incorrect_answers: &[String],
    ) -> Result<Uuid, DomainError> {
        let text = require_text("text", text)?;
        let correct_answer = require_text("correct_answer", correct_answer)?;
        let incorrect_answers: Vec<String> = incorrect_answers
            .iter()
            .map(|answer| answer.trim())
            .filter(|answer| !answer.is_empty())
            .map(str::to_owned)
            .collect();

        if self.quiz.quiz_type == Some(QuizType::MultipleChoice)
            && incorrect_answers.len() < INCORRECT_ANSWER_COUNT
        {
            return Err(DomainError::validation(
                "incorrect_answers",
                format!(
                    "a multiple-choice question needs at least {INCORRECT_ANSWER_COUNT} incorrect answers, got {}",
                    incorrect_answers.len()
                ),
            ));
        }

        let id = Uuid::new_v4();
        self.quiz.questions.push(Question {
            id,
            text,
            correct_answer,
            incorrect_answers,
        });
        Ok(id)
    }

    /// Removes every question whose id is in `ids`. Unknown ids are ignored.
    /// Returns how many questions were removed.
    pub fn remove_questions(&mut self, ids: &HashSet<Uuid>) -> usize {
        let before = self.quiz.questions.len();
        self.quiz
            .questions
            .retain(|question| !ids.contains(&question.id));
        before - self.quiz.questions.len()
    }

    /// Checks that the quiz can be listed in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty or there is no
    /// valid question.
    pub fn ensure_publishable(&self) -> Result<(), DomainError> {
        if self.quiz.name.trim().is_empty() {
            return Err(DomainError::validation("name", "a quiz needs a name"));
        }
        if self.quiz.valid_question_count() == 0 {
            return Err(DomainError::validation(
                "questions",
                "a quiz needs at least one valid question",
            ));
        }
        Ok(())
    }
}

/// Input for a new lesson resource.
#[derive(Debug, Clone)]
pub struct NewResource {
    pub name: String,
    pub resource_type: ResourceType,
    pub content: String,
    pub pretext: String,
}

/// A course under construction.
#[derive(Debug, Clone)]
pub struct CourseDraft {
    course: Course,
}

impl CourseDraft {
    /// Starts an empty draft.
    #[must_use]
    pub fn create(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            course: Course::new(id, now),
        }
    }

    /// Wraps a stored course for editing.
    #[must_use]
    pub fn from_course(course: Course) -> Self {
        Self { course }
    }

    /// The course in its current state.
    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    /// Unwraps the edited course.
    #[must_use]
    pub fn into_course(self) -> Course {
        self.course
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.course.updated_at = now;
    }

    /// Sets the course name. `name` must already be validated.
    pub fn rename(&mut self, name: String) {
        self.course.name = name;
    }

    /// Sets the course description. `description` must already be validated.
    pub fn describe(&mut self, description: String) {
        self.course.description = description;
    }

    /// Appends a lesson and returns its position.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` or `introduction` is blank.
    pub fn add_lesson(&mut self, name: &str, introduction: &str) -> Result<usize, DomainError> {
        let name = require_text("name", name)?;
        let introduction = require_text("introduction", introduction)?;
        self.course.lessons.push(Lesson {
            id: Uuid::new_v4(),
            name,
            introduction,
            resources: Vec::new(),
        });
        Ok(self.course.lessons.len() - 1)
    }

    /// Renames the lesson at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `name` is blank, or
    /// `DomainError::LessonNotFound` if `index` no longer resolves.
    pub fn rename_lesson(&mut self, index: usize, name: &str) -> Result<Uuid, DomainError> {
        let name = require_text("name", name)?;
        let lesson = self.course.lesson_mut(index)?;
        lesson.name = name;
        Ok(lesson.id)
    }

    /// Replaces the introduction of the lesson at `index`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `introduction` is blank, or
    /// `DomainError::LessonNotFound` if `index` no longer resolves.
    pub fn set_lesson_introduction(
        &mut self,
        index: usize,
        introduction: &str,
    ) -> Result<Uuid, DomainError> {
        let introduction = require_text("introduction", introduction)?;
        let lesson = self.course.lesson_mut(index)?;
        lesson.introduction = introduction;
        Ok(lesson.id)
    }

    /// Removes the lesson at `index`. Later lessons shift down by one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LessonNotFound` if `index` no longer resolves.
    pub fn delete_lesson(&mut self, index: usize) -> Result<Lesson, DomainError> {
        self.course.lesson(index)?;
        Ok(self.course.lessons.remove(index))
    }

    /// Appends a resource to the lesson at `index` and returns its position
    /// within the lesson.
    ///
    /// Quiz references are checked for syntax here; the handler checks that
    /// the quiz exists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name or content is blank or a
    /// quiz reference is not an id, or `DomainError::LessonNotFound` if
    /// `index` no longer resolves.
    pub fn add_resource(
        &mut self,
        index: usize,
        resource: NewResource,
    ) -> Result<usize, DomainError> {
        let name = require_text("name", &resource.name)?;
        let content = require_text("content", &resource.content)?;
        if resource.resource_type == ResourceType::Quiz {
            parse_quiz_reference(&content)?;
        }
        let lesson = self.course.lesson_mut(index)?;
        lesson.resources.push(Resource {
            id: Uuid::new_v4(),
            name,
            resource_type: resource.resource_type,
            content,
            pretext: resource.pretext.trim().to_owned(),
        });
        Ok(lesson.resources.len() - 1)
    }

    /// Removes the resources at `positions` from the lesson at `index`.
    ///
    /// Positions are applied from highest to lowest so every position refers
    /// to the list as it was before the batch. Positions past the end are
    /// ignored. Returns how many resources were removed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LessonNotFound` if `index` no longer resolves.
    pub fn remove_resources(
        &mut self,
        index: usize,
        positions: &[usize],
    ) -> Result<usize, DomainError> {
        let lesson = self.course.lesson_mut(index)?;
        let mut positions = positions.to_vec();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        positions.dedup();

        let mut removed = 0;
        for position in positions {
            if position < lesson.resources.len() {
                lesson.resources.remove(position);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Checks that the course can be listed in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty or there is no
    /// lesson.
    pub fn ensure_publishable(&self) -> Result<(), DomainError> {
        if self.course.name.trim().is_empty() {
            return Err(DomainError::validation("name", "a course needs a name"));
        }
        if self.course.lessons.is_empty() {
            return Err(DomainError::validation(
                "lessons",
                "a course needs at least one lesson",
            ));
        }
        Ok(())
    }
}

/// Parses the content of a quiz-typed resource.
///
/// # Errors
///
/// Returns `DomainError::Validation` on field `content` if it is not a quiz id.
pub fn parse_quiz_reference(content: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(content.trim())
        .map_err(|_| DomainError::validation("content", "a quiz resource must hold a quiz id"))
}
