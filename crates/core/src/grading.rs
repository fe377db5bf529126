//! Pure answer grading.
//!
//! `is_correct` is total: every question variant combined with every
//! submitted-answer shape (including a missing answer) maps to a boolean,
//! and nothing here can fail or touch state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Question, QuestionId, QuestionKind};

/// A value submitted for one question during an attempt.
///
/// The variant carried does not have to match the question variant; grading
/// treats a mismatch as simply incorrect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Answer {
    /// Selected option index for a multiple-choice question.
    Choice(usize),
    /// True/false selection.
    Bool(bool),
    /// Free text for short-answer and essay questions.
    Text(String),
}

/// Submitted answers for an attempt, keyed by question id.
pub type AnswerMap = HashMap<QuestionId, Answer>;

/// Grades one submitted answer against a question's answer key.
///
/// Rules:
/// - multiple choice: the submitted index equals `correct_index`
/// - true/false: the submitted boolean equals `correct_value`
/// - short answer: text equality after lower-casing and trimming both sides
/// - essay: always `false` (manual grading only)
/// - absent answer or mismatched shape: `false`
#[must_use]
pub fn is_correct(question: &Question, answer: Option<&Answer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (question.kind(), answer) {
        (QuestionKind::MultipleChoice { correct_index, .. }, Answer::Choice(selected)) => {
            selected == correct_index
        }
        (QuestionKind::TrueFalse { correct_value }, Answer::Bool(submitted)) => {
            submitted == correct_value
        }
        (QuestionKind::ShortAnswer { correct_text }, Answer::Text(submitted)) => {
            submitted.trim().to_lowercase() == correct_text.trim().to_lowercase()
        }
        (QuestionKind::Essay, _) => false,
        _ => false,
    }
}

/// Whether a submission counts as "answered" for progress display.
///
/// Matches `is_correct`-style shape checks, except essays: any non-blank
/// text counts as answered. This is a presentation convenience only and
/// never contributes to the persisted score.
#[must_use]
pub fn is_answered(question: &Question, answer: Option<&Answer>) -> bool {
    let Some(answer) = answer else {
        return false;
    };

    match (question.kind(), answer) {
        (QuestionKind::MultipleChoice { options, .. }, Answer::Choice(selected)) => {
            *selected < options.len()
        }
        (QuestionKind::TrueFalse { .. }, Answer::Bool(_)) => true,
        (QuestionKind::ShortAnswer { .. } | QuestionKind::Essay, Answer::Text(text)) => {
            !text.trim().is_empty()
        }
        _ => false,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
