use async_trait::async_trait;
use quiz_core::model::{Quiz, QuizId, QuizResult, ResultId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for quizzes.
///
/// `delete_quiz` cascades: a quiz's results are removed together with it.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist or update a quiz, questions included.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError>;

    /// Fetch a quiz by id, or `None` if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or mapping failures.
    async fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError>;

    /// List quizzes, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or mapping failures.
    async fn list_quizzes(&self, limit: u32) -> Result<Vec<Quiz>, StorageError>;

    /// Delete a quiz and all results recorded against it.
    ///
    /// Deleting an absent id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete cannot be executed.
    async fn delete_quiz(&self, id: &QuizId) -> Result<(), StorageError>;
}

/// Repository contract for persisted attempt results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Persist a finished attempt's result.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn insert_result(&self, result: &QuizResult) -> Result<(), StorageError>;

    /// Fetch a result by id, or `None` if missing.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or mapping failures.
    async fn get_result(&self, id: &ResultId) -> Result<Option<QuizResult>, StorageError>;

    /// List results for one quiz, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or mapping failures.
    async fn results_for_quiz(&self, quiz_id: &QuizId) -> Result<Vec<QuizResult>, StorageError>;

    /// List results across all quizzes, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or mapping failures.
    async fn list_results(&self, limit: u32) -> Result<Vec<QuizResult>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    results: Arc<Mutex<HashMap<ResultId, QuizResult>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(Mutex::new(HashMap::new())),
            results: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id().clone(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn list_quizzes(&self, limit: u32) -> Result<Vec<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut quizzes: Vec<Quiz> = guard.values().cloned().collect();
        quizzes.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        quizzes.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(quizzes)
    }

    async fn delete_quiz(&self, id: &QuizId) -> Result<(), StorageError> {
        {
            let mut guard = self
                .quizzes
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.remove(id);
        }
        let mut results = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        results.retain(|_, result| result.quiz_id() != id);
        Ok(())
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn insert_result(&self, result: &QuizResult) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(result.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(result.id().clone(), result.clone());
        Ok(())
    }

    async fn get_result(&self, id: &ResultId) -> Result<Option<QuizResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn results_for_quiz(&self, quiz_id: &QuizId) -> Result<Vec<QuizResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut results: Vec<QuizResult> = guard
            .values()
            .filter(|r| r.quiz_id() == quiz_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.ended_at().cmp(&a.ended_at()));
        Ok(results)
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<QuizResult>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut results: Vec<QuizResult> = guard.values().cloned().collect();
        results.sort_by(|a, b| b.ended_at().cmp(&a.ended_at()));
        results.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(results)
    }
}

/// Aggregates quiz and result repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub results: Arc<dyn ResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo);
        Self { quizzes, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::grading::{Answer, AnswerMap};
    use quiz_core::model::{Question, QuestionId, QuestionKind, QuizSettings};
    use quiz_core::time::fixed_now;

    fn build_quiz(id: &str) -> Quiz {
        let question = Question::new(
            QuestionId::new(format!("{id}-q1")),
            "Is the sky blue?",
            QuestionKind::TrueFalse {
                correct_value: true,
            },
            10,
            None,
            None,
        )
        .unwrap();
        Quiz::new(
            QuizId::new(id),
            format!("Quiz {id}"),
            None,
            vec![question],
            QuizSettings::default(),
            fixed_now(),
            fixed_now(),
        )
        .unwrap()
    }

    fn build_result(id: &str, quiz: &Quiz) -> QuizResult {
        let mut answers: AnswerMap = AnswerMap::new();
        answers.insert(quiz.questions()[0].id().clone(), Answer::Bool(true));
        QuizResult::new(
            ResultId::new(id),
            quiz.id().clone(),
            answers,
            10,
            10,
            fixed_now(),
            fixed_now() + chrono::Duration::minutes(2),
            true,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn round_trips_quiz() {
        let repo = InMemoryRepository::new();
        let quiz = build_quiz("z1");
        repo.upsert_quiz(&quiz).await.unwrap();

        let fetched = repo.get_quiz(quiz.id()).await.unwrap().unwrap();
        assert_eq!(fetched, quiz);
        assert!(
            repo.get_quiz(&QuizId::new("missing"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn list_orders_by_updated_at_descending() {
        let repo = InMemoryRepository::new();
        let older = build_quiz("z1");
        repo.upsert_quiz(&older).await.unwrap();

        let newer = Quiz::new(
            QuizId::new("z2"),
            "Newer",
            None,
            Vec::new(),
            QuizSettings::default(),
            fixed_now(),
            fixed_now() + chrono::Duration::hours(1),
        )
        .unwrap();
        repo.upsert_quiz(&newer).await.unwrap();

        let listed = repo.list_quizzes(10).await.unwrap();
        assert_eq!(listed[0].id().as_str(), "z2");
        assert_eq!(listed[1].id().as_str(), "z1");
    }

    #[tokio::test]
    async fn delete_quiz_cascades_to_results() {
        let repo = InMemoryRepository::new();
        let quiz = build_quiz("z1");
        let other = build_quiz("z2");
        repo.upsert_quiz(&quiz).await.unwrap();
        repo.upsert_quiz(&other).await.unwrap();
        repo.insert_result(&build_result("r1", &quiz)).await.unwrap();
        repo.insert_result(&build_result("r2", &other)).await.unwrap();

        repo.delete_quiz(quiz.id()).await.unwrap();

        assert!(repo.get_quiz(quiz.id()).await.unwrap().is_none());
        assert!(repo.results_for_quiz(quiz.id()).await.unwrap().is_empty());
        assert_eq!(repo.results_for_quiz(other.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_result_rejects_duplicate_id() {
        let repo = InMemoryRepository::new();
        let quiz = build_quiz("z1");
        let result = build_result("r1", &quiz);
        repo.insert_result(&result).await.unwrap();
        let err = repo.insert_result(&result).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }
}
