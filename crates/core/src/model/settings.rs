use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("time limit must be > 0 minutes")]
    InvalidTimeLimit,

    #[error("passing score must be between 0 and 100")]
    InvalidPassingScore,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Playback configuration for a quiz.
///
/// Controls presentation order, feedback, and the optional pass threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct QuizSettings {
    shuffle_questions: bool,
    shuffle_options: bool,
    show_correct_answers: bool,
    allow_review: bool,
    time_limit_minutes: Option<u32>,
    passing_score_percent: Option<u8>,
}

impl QuizSettings {
    /// Creates custom quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the time limit is zero or the passing
    /// score is above 100.
    #[allow(clippy::fn_params_excessive_bools)]
    pub fn new(
        shuffle_questions: bool,
        shuffle_options: bool,
        show_correct_answers: bool,
        allow_review: bool,
        time_limit_minutes: Option<u32>,
        passing_score_percent: Option<u8>,
    ) -> Result<Self, SettingsError> {
        if time_limit_minutes == Some(0) {
            return Err(SettingsError::InvalidTimeLimit);
        }
        if matches!(passing_score_percent, Some(p) if p > 100) {
            return Err(SettingsError::InvalidPassingScore);
        }

        Ok(Self {
            shuffle_questions,
            shuffle_options,
            show_correct_answers,
            allow_review,
            time_limit_minutes,
            passing_score_percent,
        })
    }

    // Accessors
    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }

    #[must_use]
    pub fn show_correct_answers(&self) -> bool {
        self.show_correct_answers
    }

    #[must_use]
    pub fn allow_review(&self) -> bool {
        self.allow_review
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_minutes
    }

    #[must_use]
    pub fn passing_score_percent(&self) -> Option<u8> {
        self.passing_score_percent
    }

    /// The total attempt budget in seconds, when a time limit is set.
    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_minutes.map(|m| m * 60)
    }
}

impl Default for QuizSettings {
    /// No shuffling, answers shown, review allowed, no limits.
    fn default() -> Self {
        Self {
            shuffle_questions: false,
            shuffle_options: false,
            show_correct_answers: true,
            allow_review: true,
            time_limit_minutes: None,
            passing_score_percent: None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
