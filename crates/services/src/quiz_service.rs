use std::sync::Arc;

use quiz_core::editor::QuizDraft;
use quiz_core::model::{Quiz, QuizId};
use quiz_core::time::Clock;
use storage::repository::QuizRepository;

use crate::error::QuizServiceError;

/// Orchestrates quiz authoring and persistence.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { clock, quizzes }
    }

    /// Validate a draft, build a new quiz from it, and persist it.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Validation` when the draft is invalid.
    /// Returns `QuizServiceError::Storage` if persistence fails.
    pub async fn create_quiz(&self, draft: &QuizDraft) -> Result<QuizId, QuizServiceError> {
        let now = self.clock.now();
        let quiz = draft.clone().build(QuizId::generate(), now, now)?;
        self.quizzes.upsert_quiz(&quiz).await?;
        Ok(quiz.id().clone())
    }

    /// Save a draft over an existing quiz, keeping its creation time.
    ///
    /// Question ids present in the draft are kept, so existing results
    /// keep referring to the right questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` when the quiz does not exist.
    /// Returns `QuizServiceError::Validation` when the draft is invalid.
    /// Returns `QuizServiceError::Storage` if persistence fails.
    pub async fn save_quiz(
        &self,
        quiz_id: &QuizId,
        draft: &QuizDraft,
    ) -> Result<(), QuizServiceError> {
        let existing = self
            .quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or(QuizServiceError::NotFound)?;

        let updated = draft
            .clone()
            .build(quiz_id.clone(), existing.created_at(), self.clock.now())?;
        self.quizzes.upsert_quiz(&updated).await?;
        Ok(())
    }

    /// Fetch a quiz by id.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` when the quiz does not exist.
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn get_quiz(&self, quiz_id: &QuizId) -> Result<Quiz, QuizServiceError> {
        self.quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or(QuizServiceError::NotFound)
    }

    /// List quizzes most recently updated first, up to the given limit.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn list_quizzes(&self, limit: u32) -> Result<Vec<Quiz>, QuizServiceError> {
        let quizzes = self.quizzes.list_quizzes(limit).await?;
        Ok(quizzes)
    }

    /// List quizzes whose title or description contains the query,
    /// case-insensitively. A blank query returns everything.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn search_quizzes(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Quiz>, QuizServiceError> {
        let quizzes = self.quizzes.list_quizzes(limit).await?;
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(quizzes);
        }
        Ok(quizzes
            .into_iter()
            .filter(|quiz| {
                quiz.title().to_lowercase().contains(&needle)
                    || quiz
                        .description()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Delete a quiz and, through cascade, its results.
    ///
    /// Deleting an unknown id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn delete_quiz(&self, quiz_id: &QuizId) -> Result<(), QuizServiceError> {
        self.quizzes.delete_quiz(quiz_id).await?;
        Ok(())
    }

    /// Persist a copy of a quiz under a fresh id and "(Copy)" title.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::NotFound` when the quiz does not exist.
    /// Returns `QuizServiceError::Storage` if persistence fails.
    pub async fn duplicate_quiz(&self, quiz_id: &QuizId) -> Result<QuizId, QuizServiceError> {
        let quiz = self.get_quiz(quiz_id).await?;
        let copy = quiz.duplicated(self.clock.now());
        self.quizzes.upsert_quiz(&copy).await?;
        Ok(copy.id().clone())
    }
}
