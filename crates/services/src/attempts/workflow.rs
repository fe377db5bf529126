use std::sync::Arc;

use quiz_core::model::{QuizId, QuizResult, ResultId};
use quiz_core::score::ScoreSummary;
use quiz_core::time::Clock;
use storage::repository::{QuizRepository, ResultRepository};

use super::plan::AttemptBuilder;
use super::session::PlayerSession;
use crate::error::AttemptError;

/// Outcome of finishing an attempt.
///
/// `result_id` is `None` when the attempt finished but the result could
/// not be persisted; the score is still valid and shown either way.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub summary: ScoreSummary,
    pub result_id: Option<ResultId>,
}

/// Orchestrates attempt start and result persistence.
#[derive(Clone)]
pub struct AttemptService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn ResultRepository>,
}

impl AttemptService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            results,
        }
    }

    /// Start a new attempt for the given quiz.
    ///
    /// The effective question order is fixed here, per the quiz's shuffle
    /// settings, and does not change for the lifetime of the session.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::QuizNotFound` when the quiz does not exist,
    /// `AttemptError::Empty` when it has no questions, or
    /// `AttemptError::Storage` for storage failures.
    pub async fn start_attempt(&self, quiz_id: &QuizId) -> Result<PlayerSession, AttemptError> {
        let quiz = self
            .quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or(AttemptError::QuizNotFound)?;
        let plan = AttemptBuilder::new(&quiz).build();
        PlayerSession::new(&quiz, plan.questions, self.clock.now())
    }

    /// Score a finished attempt and persist the result.
    ///
    /// Persistence failure degrades rather than fails: the score is
    /// computed in memory and returned with `result_id: None`, so a
    /// storage hiccup never hides the player's outcome.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Finished` if the attempt is not actually
    /// finished yet.
    pub async fn finish_attempt(
        &self,
        session: &mut PlayerSession,
    ) -> Result<AttemptOutcome, AttemptError> {
        if !session.is_finished() {
            return Err(AttemptError::Finished);
        }

        let summary = session.score();

        if session.result_id().is_none() {
            match self.persist_result(session, &summary).await {
                Ok(id) => session.set_result_id(id),
                Err(err) => {
                    log::warn!(
                        "failed to persist result for quiz {}: {err}",
                        session.quiz_id()
                    );
                }
            }
        }

        Ok(AttemptOutcome {
            summary,
            result_id: session.result_id().cloned(),
        })
    }

    /// Retry result persistence for a finished attempt.
    ///
    /// Useful when the append during `finish_attempt` failed on a
    /// transient storage error.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Finished` if the attempt is not finished,
    /// or `AttemptError::Storage` if persistence fails again.
    pub async fn finalize_result(
        &self,
        session: &mut PlayerSession,
    ) -> Result<ResultId, AttemptError> {
        if let Some(id) = session.result_id() {
            return Ok(id.clone());
        }
        if !session.is_finished() {
            return Err(AttemptError::Finished);
        }

        let summary = session.score();
        let id = self.persist_result(session, &summary).await?;
        session.set_result_id(id.clone());
        Ok(id)
    }

    async fn persist_result(
        &self,
        session: &PlayerSession,
        summary: &ScoreSummary,
    ) -> Result<ResultId, AttemptError> {
        let ended_at = session.finished_at().ok_or(AttemptError::Finished)?;
        let result = QuizResult::new(
            ResultId::generate(),
            session.quiz_id().clone(),
            session.answers().clone(),
            summary.earned_points,
            summary.total_points,
            session.started_at(),
            ended_at,
            summary.passed,
        )?;
        let id = result.id().clone();
        self.results.insert_result(&result).await?;
        Ok(id)
    }
}
