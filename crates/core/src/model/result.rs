use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::grading::AnswerMap;
use crate::model::ids::{QuizId, ResultId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultError {
    #[error("ended_at is before started_at")]
    InvalidTimeRange,

    #[error("score ({score}) exceeds total points ({total_points})")]
    ScoreExceedsTotal { score: u32, total_points: u32 },
}

/// Persisted outcome of one completed quiz attempt.
///
/// Created once when an attempt finishes and immutable thereafter. Holds a
/// weak reference to its quiz by id; deleting the quiz cascades to its
/// results at the storage layer.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResult {
    id: ResultId,
    quiz_id: QuizId,
    answers: AnswerMap,
    score: u32,
    total_points: u32,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    passed: bool,
}

impl QuizResult {
    /// Creates a result record for a finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `ResultError::InvalidTimeRange` if `ended_at` precedes
    /// `started_at`, or `ResultError::ScoreExceedsTotal` if the earned
    /// score is larger than the total.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ResultId,
        quiz_id: QuizId,
        answers: AnswerMap,
        score: u32,
        total_points: u32,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        passed: bool,
    ) -> Result<Self, ResultError> {
        if ended_at < started_at {
            return Err(ResultError::InvalidTimeRange);
        }
        if score > total_points {
            return Err(ResultError::ScoreExceedsTotal {
                score,
                total_points,
            });
        }

        Ok(Self {
            id,
            quiz_id,
            answers,
            score,
            total_points,
            started_at,
            ended_at,
            passed,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ResultId {
        &self.id
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_points(&self) -> u32 {
        self.total_points
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// Attempt duration in whole seconds.
    #[must_use]
    pub fn duration_secs(&self) -> i64 {
        (self.ended_at - self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use std::collections::HashMap;

    #[test]
    fn new_rejects_inverted_time_range() {
        let now = fixed_now();
        let err = QuizResult::new(
            ResultId::new("r1"),
            QuizId::new("z1"),
            HashMap::new(),
            0,
            10,
            now,
            now - chrono::Duration::seconds(1),
            false,
        )
        .unwrap_err();
        assert_eq!(err, ResultError::InvalidTimeRange);
    }

    #[test]
    fn new_rejects_score_above_total() {
        let now = fixed_now();
        let err = QuizResult::new(
            ResultId::new("r1"),
            QuizId::new("z1"),
            HashMap::new(),
            11,
            10,
            now,
            now,
            true,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ResultError::ScoreExceedsTotal {
                score: 11,
                total_points: 10
            }
        );
    }

    #[test]
    fn duration_is_computed_from_timestamps() {
        let started = fixed_now();
        let ended = started + chrono::Duration::seconds(95);
        let result = QuizResult::new(
            ResultId::new("r1"),
            QuizId::new("z1"),
            HashMap::new(),
            5,
            10,
            started,
            ended,
            false,
        )
        .unwrap();
        assert_eq!(result.duration_secs(), 95);
        assert_eq!(result.quiz_id().as_str(), "z1");
    }
}
