use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("points must be at least 1")]
    InvalidPoints,

    #[error("time limit must be > 0 seconds")]
    InvalidTimeLimit,

    #[error("multiple choice needs between 2 and 6 options, got {len}")]
    InvalidOptionCount { len: usize },

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("correct text cannot be empty")]
    EmptyCorrectText,
}

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// The four question variants and their answer keys.
///
/// The variant determines both how the question is presented and how a
/// submitted answer is graded. Adding a variant forces every grading and
/// persistence match to be revisited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice {
        options: Vec<String>,
        correct_index: usize,
    },
    TrueFalse {
        correct_value: bool,
    },
    ShortAnswer {
        correct_text: String,
    },
    /// No canonical answer; graded manually (never by the engine).
    Essay,
}

impl QuestionKind {
    /// Short machine-friendly label for the variant.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::TrueFalse { .. } => "true-false",
            QuestionKind::ShortAnswer { .. } => "short-answer",
            QuestionKind::Essay => "essay",
        }
    }

    /// Human-readable label for the variant.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "Multiple Choice",
            QuestionKind::TrueFalse { .. } => "True/False",
            QuestionKind::ShortAnswer { .. } => "Short Answer",
            QuestionKind::Essay => "Essay",
        }
    }

    fn validate(&self) -> Result<(), QuestionError> {
        match self {
            QuestionKind::MultipleChoice {
                options,
                correct_index,
            } => {
                if !(2..=6).contains(&options.len()) {
                    return Err(QuestionError::InvalidOptionCount { len: options.len() });
                }
                if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
                    return Err(QuestionError::EmptyOption { index });
                }
                if *correct_index >= options.len() {
                    return Err(QuestionError::CorrectIndexOutOfRange {
                        index: *correct_index,
                        len: options.len(),
                    });
                }
                Ok(())
            }
            QuestionKind::ShortAnswer { correct_text } => {
                if correct_text.trim().is_empty() {
                    return Err(QuestionError::EmptyCorrectText);
                }
                Ok(())
            }
            QuestionKind::TrueFalse { .. } | QuestionKind::Essay => Ok(()),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single quiz question with its answer key and scoring weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    kind: QuestionKind,
    points: u32,
    explanation: Option<String>,
    time_limit_secs: Option<u32>,
}

impl Question {
    /// Creates a new question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is empty, points are zero, the
    /// time limit is zero, or the variant payload is inconsistent.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        kind: QuestionKind,
        points: u32,
        explanation: Option<String>,
        time_limit_secs: Option<u32>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if points < 1 {
            return Err(QuestionError::InvalidPoints);
        }
        if time_limit_secs == Some(0) {
            return Err(QuestionError::InvalidTimeLimit);
        }
        kind.validate()?;

        let explanation = explanation
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty());

        Ok(Self {
            id,
            prompt: prompt.trim().to_owned(),
            kind,
            points,
            explanation,
            time_limit_secs,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    /// Number of options for multiple-choice questions, 0 otherwise.
    #[must_use]
    pub fn option_count(&self) -> usize {
        match &self.kind {
            QuestionKind::MultipleChoice { options, .. } => options.len(),
            _ => 0,
        }
    }

    /// Replace the option order of a multiple-choice question.
    ///
    /// `order` maps new positions to old indices. Used when presenting
    /// shuffled options; the correct index is remapped so grading against
    /// the displayed order stays consistent. Non-multiple-choice questions
    /// and malformed permutations are returned unchanged.
    #[must_use]
    pub fn with_option_order(mut self, order: &[usize]) -> Self {
        if let QuestionKind::MultipleChoice {
            options,
            correct_index,
        } = &self.kind
        {
            if order.len() != options.len() {
                return self;
            }
            let mut reordered = Vec::with_capacity(options.len());
            let mut new_correct = None;
            for (new_pos, old_pos) in order.iter().enumerate() {
                let Some(option) = options.get(*old_pos) else {
                    return self;
                };
                reordered.push(option.clone());
                if *old_pos == *correct_index {
                    new_correct = Some(new_pos);
                }
            }
            let Some(new_correct) = new_correct else {
                return self;
            };
            self.kind = QuestionKind::MultipleChoice {
                options: reordered,
                correct_index: new_correct,
            };
        }
        self
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn mc_kind() -> QuestionKind {
        QuestionKind::MultipleChoice {
            options: vec!["a".into(), "b".into(), "c".into()],
            correct_index: 1,
        }
    }

    #[test]
    fn new_rejects_empty_prompt() {
        let err = Question::new(QuestionId::new("q1"), "   ", mc_kind(), 10, None, None)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn new_rejects_zero_points() {
        let err = Question::new(QuestionId::new("q1"), "Prompt", mc_kind(), 0, None, None)
            .unwrap_err();
        assert_eq!(err, QuestionError::InvalidPoints);
    }

    #[test]
    fn new_rejects_zero_time_limit() {
        let err = Question::new(QuestionId::new("q1"), "Prompt", mc_kind(), 5, None, Some(0))
            .unwrap_err();
        assert_eq!(err, QuestionError::InvalidTimeLimit);
    }

    #[test]
    fn multiple_choice_needs_two_to_six_options() {
        let kind = QuestionKind::MultipleChoice {
            options: vec!["only".into()],
            correct_index: 0,
        };
        let err = Question::new(QuestionId::new("q1"), "Prompt", kind, 5, None, None)
            .unwrap_err();
        assert_eq!(err, QuestionError::InvalidOptionCount { len: 1 });

        let kind = QuestionKind::MultipleChoice {
            options: (0..7).map(|i| format!("opt{i}")).collect(),
            correct_index: 0,
        };
        let err = Question::new(QuestionId::new("q1"), "Prompt", kind, 5, None, None)
            .unwrap_err();
        assert_eq!(err, QuestionError::InvalidOptionCount { len: 7 });
    }

    #[test]
    fn multiple_choice_rejects_out_of_range_correct_index() {
        let kind = QuestionKind::MultipleChoice {
            options: vec!["a".into(), "b".into()],
            correct_index: 2,
        };
        let err = Question::new(QuestionId::new("q1"), "Prompt", kind, 5, None, None)
            .unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 2, len: 2 });
    }

    #[test]
    fn multiple_choice_rejects_blank_option() {
        let kind = QuestionKind::MultipleChoice {
            options: vec!["a".into(), "  ".into()],
            correct_index: 0,
        };
        let err = Question::new(QuestionId::new("q1"), "Prompt", kind, 5, None, None)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });
    }

    #[test]
    fn short_answer_rejects_blank_correct_text() {
        let kind = QuestionKind::ShortAnswer {
            correct_text: "  ".into(),
        };
        let err = Question::new(QuestionId::new("q1"), "Prompt", kind, 5, None, None)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyCorrectText);
    }

    #[test]
    fn new_trims_prompt_and_filters_empty_explanation() {
        let q = Question::new(
            QuestionId::new("q1"),
            "  What is 2 + 2?  ",
            QuestionKind::Essay,
            1,
            Some("   ".into()),
            None,
        )
        .unwrap();
        assert_eq!(q.prompt(), "What is 2 + 2?");
        assert_eq!(q.explanation(), None);
    }

    #[test]
    fn with_option_order_remaps_correct_index() {
        let q = Question::new(QuestionId::new("q1"), "Pick b", mc_kind(), 5, None, None)
            .unwrap();
        let shuffled = q.with_option_order(&[2, 0, 1]);
        let QuestionKind::MultipleChoice {
            options,
            correct_index,
        } = shuffled.kind()
        else {
            panic!("expected multiple choice");
        };
        assert_eq!(options, &["c", "a", "b"]);
        assert_eq!(*correct_index, 2);
    }

    #[test]
    fn with_option_order_ignores_bad_permutation() {
        let q = Question::new(QuestionId::new("q1"), "Pick b", mc_kind(), 5, None, None)
            .unwrap();
        let same = q.clone().with_option_order(&[0, 1]);
        assert_eq!(same, q);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(mc_kind().tag(), "multiple-choice");
        assert_eq!(QuestionKind::Essay.label(), "Essay");
    }
}
