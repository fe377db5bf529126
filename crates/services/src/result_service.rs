use std::sync::Arc;

use quiz_core::model::{QuizId, QuizResult, ResultId};
use storage::repository::ResultRepository;

use crate::error::ResultServiceError;

//
// ─── QUIZ STATS ────────────────────────────────────────────────────────────────
//

/// Aggregate statistics over the stored results of one quiz.
///
/// Scores here are raw earned points, not percentages. All fields are
/// zero when the quiz has no results yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizStats {
    pub total_attempts: usize,
    pub average_score: f64,
    pub pass_rate: f64,
    pub best_score: u32,
    pub worst_score: u32,
}

impl QuizStats {
    fn empty() -> Self {
        Self {
            total_attempts: 0,
            average_score: 0.0,
            pass_rate: 0.0,
            best_score: 0,
            worst_score: 0,
        }
    }

    fn from_results(results: &[QuizResult]) -> Self {
        if results.is_empty() {
            return Self::empty();
        }

        let total = results.len();
        let score_sum: u64 = results.iter().map(|r| u64::from(r.score())).sum();
        let passed = results.iter().filter(|r| r.passed()).count();
        let best = results.iter().map(QuizResult::score).max().unwrap_or(0);
        let worst = results.iter().map(QuizResult::score).min().unwrap_or(0);

        Self {
            total_attempts: total,
            average_score: score_sum as f64 / total as f64,
            pass_rate: passed as f64 / total as f64 * 100.0,
            best_score: best,
            worst_score: worst,
        }
    }
}

//
// ─── RESULT SERVICE ────────────────────────────────────────────────────────────
//

/// Read-side access to stored attempt results.
#[derive(Clone)]
pub struct ResultService {
    results: Arc<dyn ResultRepository>,
}

impl ResultService {
    #[must_use]
    pub fn new(results: Arc<dyn ResultRepository>) -> Self {
        Self { results }
    }

    /// Fetch one result by id.
    ///
    /// Returns `Ok(None)` when the result does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` if repository access fails.
    pub async fn get_result(
        &self,
        result_id: &ResultId,
    ) -> Result<Option<QuizResult>, ResultServiceError> {
        let result = self.results.get_result(result_id).await?;
        Ok(result)
    }

    /// Results for one quiz, most recently finished first.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` if repository access fails.
    pub async fn results_for_quiz(
        &self,
        quiz_id: &QuizId,
    ) -> Result<Vec<QuizResult>, ResultServiceError> {
        let results = self.results.results_for_quiz(quiz_id).await?;
        Ok(results)
    }

    /// Stored results across every quiz, most recent first, up to the
    /// given limit.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` if repository access fails.
    pub async fn list_results(&self, limit: u32) -> Result<Vec<QuizResult>, ResultServiceError> {
        let results = self.results.list_results(limit).await?;
        Ok(results)
    }

    /// Aggregate stats for one quiz; zeroed when it has no results.
    ///
    /// # Errors
    ///
    /// Returns `ResultServiceError::Storage` if repository access fails.
    pub async fn quiz_stats(&self, quiz_id: &QuizId) -> Result<QuizStats, ResultServiceError> {
        let results = self.results.results_for_quiz(quiz_id).await?;
        Ok(QuizStats::from_results(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::grading::AnswerMap;
    use quiz_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn build_result(id: &str, quiz: &str, score: u32, passed: bool) -> QuizResult {
        QuizResult::new(
            ResultId::new(id),
            QuizId::new(quiz),
            AnswerMap::new(),
            score,
            100,
            fixed_now(),
            fixed_now() + chrono::Duration::minutes(5),
            passed,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn stats_for_quiz_without_results_are_zeroed() {
        let service = ResultService::new(Arc::new(InMemoryRepository::new()));
        let stats = service.quiz_stats(&QuizId::new("z1")).await.unwrap();
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.pass_rate, 0.0);
        assert_eq!(stats.best_score, 0);
        assert_eq!(stats.worst_score, 0);
    }

    #[tokio::test]
    async fn stats_aggregate_scores_and_pass_rate() {
        let repo = Arc::new(InMemoryRepository::new());
        repo.insert_result(&build_result("r1", "z1", 80, true))
            .await
            .unwrap();
        repo.insert_result(&build_result("r2", "z1", 40, false))
            .await
            .unwrap();
        repo.insert_result(&build_result("r3", "z1", 90, true))
            .await
            .unwrap();
        repo.insert_result(&build_result("r4", "other", 100, true))
            .await
            .unwrap();

        let service = ResultService::new(repo);
        let stats = service.quiz_stats(&QuizId::new("z1")).await.unwrap();
        assert_eq!(stats.total_attempts, 3);
        assert_eq!(stats.average_score, 70.0);
        assert_eq!(stats.best_score, 90);
        assert_eq!(stats.worst_score, 40);
        assert!((stats.pass_rate - 66.666_666).abs() < 0.001);
    }
}
