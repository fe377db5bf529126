use thiserror::Error;

use crate::editor::ValidationError;
use crate::model::{QuestionError, QuizError, ResultError, SettingsError};

/// Umbrella error for callers that do not care which model rule failed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Result(#[from] ResultError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
