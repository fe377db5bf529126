//! Score aggregation for a finished attempt.
//!
//! Two numbers are deliberately kept distinct: the point-weighted
//! `earned_points / total_points` shown as the score, and the
//! question-count percentage used for the pass/fail decision. They are
//! surfaced side by side and must not be conflated.

use crate::grading::{AnswerMap, is_correct};
use crate::model::{Question, Quiz, QuizSettings};

/// Final numbers for one completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSummary {
    /// Points earned from correctly answered questions.
    pub earned_points: u32,
    /// Sum of points over all questions, answered or not.
    pub total_points: u32,
    /// Number of correctly answered questions.
    pub correct_count: u32,
    /// Number of questions in the quiz.
    pub total_count: u32,
    /// `round(100 * correct_count / total_count)`; count-based, not
    /// point-weighted. Zero for an empty quiz.
    pub percentage: u32,
    /// Pass/fail against `passing_score_percent`; always true when no
    /// threshold is configured.
    pub passed: bool,
}

impl ScoreSummary {
    /// Point-weighted percentage, for display next to the count-based one.
    #[must_use]
    pub fn points_percentage(&self) -> f64 {
        if self.total_points == 0 {
            return 0.0;
        }
        f64::from(self.earned_points) / f64::from(self.total_points) * 100.0
    }
}

/// Computes the final score for an attempt's answers.
///
/// Total, never fails: unanswered questions count as incorrect (zero
/// points), there is no partial credit and no skip-exclusion.
#[must_use]
pub fn compute_result(quiz: &Quiz, answers: &AnswerMap) -> ScoreSummary {
    score_questions(quiz.questions(), quiz.settings(), answers)
}

/// Scores an explicit question list (e.g. an attempt's effective order).
///
/// Question order does not affect the outcome, so a shuffled attempt scores
/// identically to the authored quiz.
#[must_use]
pub fn score_questions(
    questions: &[Question],
    settings: &QuizSettings,
    answers: &AnswerMap,
) -> ScoreSummary {
    let mut earned_points = 0_u32;
    let mut total_points = 0_u32;
    let mut correct_count = 0_u32;

    for question in questions {
        total_points += question.points();
        if is_correct(question, answers.get(question.id())) {
            earned_points += question.points();
            correct_count += 1;
        }
    }

    let total_count = u32::try_from(questions.len()).unwrap_or(u32::MAX);
    let percentage = percentage_of(correct_count, total_count);
    let passed = passes(settings, percentage);

    ScoreSummary {
        earned_points,
        total_points,
        correct_count,
        total_count,
        percentage,
        passed,
    }
}

/// Pass/fail decision for a count-based percentage, boundary inclusive.
#[must_use]
pub fn passes(settings: &QuizSettings, percentage: u32) -> bool {
    match settings.passing_score_percent() {
        Some(threshold) => percentage >= u32::from(threshold),
        None => true,
    }
}

fn percentage_of(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = u64::from(correct) * 100;
    let total = u64::from(total);
    // round-half-up integer division
    u32::try_from((scaled + total / 2) / total).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
