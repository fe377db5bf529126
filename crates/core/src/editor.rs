//! Editor-side save gate.
//!
//! Drafts are freely mutable shapes the editor works on; `validate` returns
//! every problem as a human-readable message, and `build` refuses to
//! produce a domain value while any message remains. Grading never
//! revalidates — a quiz that reached storage is assumed well-formed.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{
    Question, QuestionId, QuestionKind, Quiz, QuizId, QuizSettings,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("validation failed: {}", messages.join("; "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

//
// ─── QUESTION DRAFT ────────────────────────────────────────────────────────────
//

/// Editable shape for a question, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: String,
    pub kind: QuestionKind,
    pub points: u32,
    pub explanation: Option<String>,
    pub time_limit_secs: Option<u32>,
}

impl QuestionDraft {
    /// A blank draft of the given variant with the editor defaults.
    #[must_use]
    pub fn blank(kind: QuestionKind) -> Self {
        Self {
            prompt: String::new(),
            kind,
            points: 1,
            explanation: None,
            time_limit_secs: None,
        }
    }

    /// Collects every reason this draft cannot be saved.
    ///
    /// An empty list means the draft is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.prompt.trim().is_empty() {
            errors.push("Question text is required".to_owned());
        }
        if self.points < 1 {
            errors.push("Points must be at least 1".to_owned());
        }
        if self.time_limit_secs == Some(0) {
            errors.push("Time limit must be greater than zero".to_owned());
        }

        match &self.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_index,
            } => {
                if options.len() < 2 {
                    errors.push(
                        "Multiple choice questions need at least 2 options".to_owned(),
                    );
                } else if options.len() > 6 {
                    errors.push(
                        "Multiple choice questions allow at most 6 options".to_owned(),
                    );
                }
                if options.iter().any(|o| o.trim().is_empty()) {
                    errors.push("Options cannot be empty".to_owned());
                }
                if *correct_index >= options.len() {
                    errors.push("Correct answer is required".to_owned());
                }
            }
            QuestionKind::ShortAnswer { correct_text } => {
                if correct_text.trim().is_empty() {
                    errors.push(
                        "Short answer questions need a correct answer".to_owned(),
                    );
                }
            }
            QuestionKind::TrueFalse { .. } | QuestionKind::Essay => {}
        }

        errors
    }

    /// Builds the domain question once validation passes.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` carrying every message from [`validate`].
    ///
    /// [`validate`]: QuestionDraft::validate
    pub fn build(self, id: QuestionId) -> Result<Question, ValidationError> {
        let messages = self.validate();
        if !messages.is_empty() {
            return Err(ValidationError { messages });
        }

        Question::new(
            id,
            self.prompt,
            self.kind,
            self.points,
            self.explanation,
            self.time_limit_secs,
        )
        .map_err(|e| ValidationError {
            messages: vec![e.to_string()],
        })
    }
}

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        Self {
            prompt: question.prompt().to_owned(),
            kind: question.kind().clone(),
            points: question.points(),
            explanation: question.explanation().map(ToOwned::to_owned),
            time_limit_secs: question.time_limit_secs(),
        }
    }
}

//
// ─── QUIZ DRAFT ────────────────────────────────────────────────────────────────
//

/// Editable shape for a whole quiz.
///
/// Question id assignment happens at build time: drafts without an id get a
/// fresh one, drafts edited from an existing question keep theirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<(Option<QuestionId>, QuestionDraft)>,
    pub settings: QuizSettings,
}

impl QuizDraft {
    /// The state a freshly created quiz opens in.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            title: "New Quiz".to_owned(),
            description: None,
            questions: Vec::new(),
            settings: QuizSettings::default(),
        }
    }

    /// Collects every reason this draft cannot be saved.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title is required".to_owned());
        }
        if self.questions.is_empty() {
            errors.push("At least one question is required".to_owned());
        }
        for (index, (_, draft)) in self.questions.iter().enumerate() {
            for message in draft.validate() {
                errors.push(format!("Question {}: {message}", index + 1));
            }
        }

        errors
    }

    /// Builds the domain quiz once validation passes.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` carrying every collected message; nothing
    /// is partially built.
    pub fn build(
        self,
        id: QuizId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Quiz, ValidationError> {
        let messages = self.validate();
        if !messages.is_empty() {
            return Err(ValidationError { messages });
        }

        let mut questions = Vec::with_capacity(self.questions.len());
        for (existing_id, draft) in self.questions {
            let question_id = existing_id.unwrap_or_else(QuestionId::generate);
            questions.push(draft.build(question_id)?);
        }

        Quiz::new(
            id,
            self.title,
            self.description,
            questions,
            self.settings,
            created_at,
            updated_at,
        )
        .map_err(|e| ValidationError {
            messages: vec![e.to_string()],
        })
    }
}

impl From<&Quiz> for QuizDraft {
    fn from(quiz: &Quiz) -> Self {
        Self {
            title: quiz.title().to_owned(),
            description: quiz.description().map(ToOwned::to_owned),
            questions: quiz
                .questions()
                .iter()
                .map(|q| (Some(q.id().clone()), QuestionDraft::from(q)))
                .collect(),
            settings: quiz.settings().clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
