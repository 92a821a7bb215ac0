//! Course entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// Kind of content a lesson resource carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Inline text.
    Text,
    /// External link.
    Link,
    /// Video URL.
    Video,
    /// Reference to a quiz by id.
    Quiz,
}

impl ResourceType {
    /// Wire name of the resource type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::Video => "video",
            Self::Quiz => "quiz",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "text" => Ok(Self::Text),
            "link" => Ok(Self::Link),
            "video" => Ok(Self::Video),
            "quiz" => Ok(Self::Quiz),
            other => Err(DomainError::validation(
                "type",
                format!("unknown resource type `{other}`"),
            )),
        }
    }
}

/// A piece of lesson content.
///
/// For [`ResourceType::Quiz`], `content` holds the referenced quiz id. The
/// quiz is not owned by the course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Stable internal id; callers address resources by position.
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub content: String,
    /// Text shown before the resource.
    pub pretext: String,
}

/// A lesson inside a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Stable internal id; callers address lessons by position.
    pub id: Uuid,
    pub name: String,
    pub introduction: String,
    pub resources: Vec<Resource>,
}

/// A course: a named, described, ordered list of lessons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    /// Display name; empty while drafting.
    pub name: String,
    /// Description; empty while drafting.
    pub description: String,
    pub lessons: Vec<Lesson>,
    /// Time of the last applied edit.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Creates an empty draft.
    #[must_use]
    pub fn new(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: String::new(),
            description: String::new(),
            lessons: Vec::new(),
            updated_at: now,
        }
    }

    /// Resolves a positional lesson reference against the current lessons.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LessonNotFound` if `index` is out of range.
    pub fn lesson(&self, index: usize) -> Result<&Lesson, DomainError> {
        self.lessons
            .get(index)
            .ok_or(DomainError::LessonNotFound { index })
    }

    /// Mutable variant of [`Course::lesson`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LessonNotFound` if `index` is out of range.
    pub fn lesson_mut(&mut self, index: usize) -> Result<&mut Lesson, DomainError> {
        self.lessons
            .get_mut(index)
            .ok_or(DomainError::LessonNotFound { index })
    }
}

impl Aggregate for Course {
    const KIND: &'static str = "course";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}
