//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::editor::ValidationError;
use quiz_core::model::{QuizError, ResultError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("quiz not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the attempt state machine and workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("quiz not found")]
    QuizNotFound,
    #[error("quiz has no questions to play")]
    Empty,
    #[error("attempt is already finished")]
    Finished,
    #[error("current question already has an answer")]
    AlreadyAnswered,
    #[error("current question has no answer yet")]
    NotAnswered,
    #[error("answer does not target the current question")]
    WrongQuestion,
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResultService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by import/export and share-link handling.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransferError {
    #[error("invalid quiz data")]
    MalformedData,
    #[error("quiz not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
