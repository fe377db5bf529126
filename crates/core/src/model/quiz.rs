use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::Question;
use crate::model::settings::QuizSettings;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("updated_at is before created_at")]
    InvalidTimeRange,
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An authored quiz: an ordered list of questions plus playback settings.
///
/// Question insertion order is presentation order (unless a shuffle setting
/// reorders the attempt). A quiz exclusively owns its questions; they are
/// never shared between quizzes. A freshly created quiz may hold zero
/// questions while it is being edited — the save gate requires at least one.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: Option<String>,
    questions: Vec<Question>,
    settings: QuizSettings,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Creates a new quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle` if the title is empty or
    /// whitespace-only, or `QuizError::InvalidTimeRange` if `updated_at`
    /// precedes `created_at`.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        description: Option<String>,
        questions: Vec<Question>,
        settings: QuizSettings,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if updated_at < created_at {
            return Err(QuizError::InvalidTimeRange);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description,
            questions,
            settings,
            created_at,
            updated_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Sum of points over all questions.
    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(Question::points).sum()
    }

    /// Returns a copy with a fresh id, "(Copy)" title suffix, and new timestamps.
    #[must_use]
    pub fn duplicated(&self, now: DateTime<Utc>) -> Self {
        Self {
            id: QuizId::generate(),
            title: format!("{} (Copy)", self.title),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Returns a copy with the given questions and a bumped `updated_at`.
    #[must_use]
    pub fn with_questions(mut self, questions: Vec<Question>, now: DateTime<Utc>) -> Self {
        self.questions = questions;
        self.updated_at = now;
        self
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
