use std::sync::Arc;

use storage::repository::Storage;

use crate::attempts::AttemptService;
use crate::error::AppServicesError;
use crate::quiz_service::QuizService;
use crate::result_service::ResultService;
use crate::transfer::TransferService;
use quiz_core::time::Clock;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz_service: Arc<QuizService>,
    attempt_service: Arc<AttemptService>,
    result_service: Arc<ResultService>,
    transfer_service: Arc<TransferService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services backed by in-memory storage, for tests and demos.
    #[must_use]
    pub fn new_in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let quiz_service = Arc::new(QuizService::new(clock, Arc::clone(&storage.quizzes)));
        let attempt_service = Arc::new(AttemptService::new(
            clock,
            Arc::clone(&storage.quizzes),
            Arc::clone(&storage.results),
        ));
        let result_service = Arc::new(ResultService::new(Arc::clone(&storage.results)));
        let transfer_service = Arc::new(TransferService::new(clock, Arc::clone(&storage.quizzes)));

        Self {
            quiz_service,
            attempt_service,
            result_service,
            transfer_service,
        }
    }

    #[must_use]
    pub fn quiz_service(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz_service)
    }

    #[must_use]
    pub fn attempt_service(&self) -> Arc<AttemptService> {
        Arc::clone(&self.attempt_service)
    }

    #[must_use]
    pub fn result_service(&self) -> Arc<ResultService> {
        Arc::clone(&self.result_service)
    }

    #[must_use]
    pub fn transfer_service(&self) -> Arc<TransferService> {
        Arc::clone(&self.transfer_service)
    }
}
