//! Import, export, and share-link handling for quizzes.
//!
//! The JSON shape is the interchange format: camelCase fields, a
//! kebab-case `type` tag per question, and the correct answer carried as
//! an index, boolean, or string depending on the question kind. Share
//! links carry the same JSON, deflate-compressed and base64url-encoded
//! so it fits in a query parameter.

use std::io::Write;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::{DeflateDecoder, DeflateEncoder};
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    Question, QuestionId, QuestionKind, Quiz, QuizId, QuizResult, QuizSettings,
};
use quiz_core::time::Clock;
use storage::repository::QuizRepository;

use crate::error::TransferError;

//
// ─── WIRE SHAPE ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizDto {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    questions: Vec<QuestionDto>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    settings: SettingsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correct_answer: Option<CorrectAnswerDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_limit: Option<u32>,
}

/// The correct answer's JSON type depends on the question kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CorrectAnswerDto {
    Bool(bool),
    Index(usize),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDto {
    shuffle_questions: bool,
    shuffle_options: bool,
    show_correct_answers: bool,
    allow_review: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    passing_score: Option<u8>,
}

impl QuizDto {
    fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id().as_str().to_owned(),
            title: quiz.title().to_owned(),
            description: quiz.description().map(ToOwned::to_owned),
            questions: quiz.questions().iter().map(QuestionDto::from_question).collect(),
            created_at: quiz.created_at(),
            updated_at: quiz.updated_at(),
            settings: SettingsDto::from_settings(quiz.settings()),
        }
    }

    fn into_quiz(
        self,
        id: QuizId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Quiz, TransferError> {
        let settings = self.settings.into_settings()?;
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDto::into_question)
            .collect::<Result<Vec<_>, _>>()?;

        Quiz::new(
            id,
            self.title,
            self.description,
            questions,
            settings,
            created_at,
            updated_at,
        )
        .map_err(|_| TransferError::MalformedData)
    }
}

impl QuestionDto {
    fn from_question(question: &Question) -> Self {
        let (options, correct_answer) = match question.kind() {
            QuestionKind::MultipleChoice {
                options,
                correct_index,
            } => (
                Some(options.clone()),
                Some(CorrectAnswerDto::Index(*correct_index)),
            ),
            QuestionKind::TrueFalse { correct_value } => {
                (None, Some(CorrectAnswerDto::Bool(*correct_value)))
            }
            QuestionKind::ShortAnswer { correct_text } => {
                (None, Some(CorrectAnswerDto::Text(correct_text.clone())))
            }
            QuestionKind::Essay => (None, None),
        };

        Self {
            id: question.id().as_str().to_owned(),
            kind: question.kind().tag().to_owned(),
            question: question.prompt().to_owned(),
            options,
            correct_answer,
            explanation: question.explanation().map(ToOwned::to_owned),
            points: question.points(),
            time_limit: question.time_limit_secs(),
        }
    }

    fn into_question(self) -> Result<Question, TransferError> {
        let kind = match self.kind.as_str() {
            "multiple-choice" => {
                let options = self.options.ok_or(TransferError::MalformedData)?;
                let correct_index = match self.correct_answer {
                    Some(CorrectAnswerDto::Index(index)) => index,
                    // Tolerate the answer given as option text.
                    Some(CorrectAnswerDto::Text(text)) => options
                        .iter()
                        .position(|o| o == &text)
                        .ok_or(TransferError::MalformedData)?,
                    _ => return Err(TransferError::MalformedData),
                };
                QuestionKind::MultipleChoice {
                    options,
                    correct_index,
                }
            }
            "true-false" => {
                let Some(CorrectAnswerDto::Bool(correct_value)) = self.correct_answer else {
                    return Err(TransferError::MalformedData);
                };
                QuestionKind::TrueFalse { correct_value }
            }
            "short-answer" => {
                let Some(CorrectAnswerDto::Text(correct_text)) = self.correct_answer else {
                    return Err(TransferError::MalformedData);
                };
                QuestionKind::ShortAnswer { correct_text }
            }
            "essay" => QuestionKind::Essay,
            _ => return Err(TransferError::MalformedData),
        };

        Question::new(
            QuestionId::new(self.id),
            self.question,
            kind,
            self.points,
            self.explanation,
            self.time_limit,
        )
        .map_err(|_| TransferError::MalformedData)
    }
}

impl SettingsDto {
    fn from_settings(settings: &QuizSettings) -> Self {
        Self {
            shuffle_questions: settings.shuffle_questions(),
            shuffle_options: settings.shuffle_options(),
            show_correct_answers: settings.show_correct_answers(),
            allow_review: settings.allow_review(),
            time_limit: settings.time_limit_minutes(),
            passing_score: settings.passing_score_percent(),
        }
    }

    fn into_settings(self) -> Result<QuizSettings, TransferError> {
        QuizSettings::new(
            self.shuffle_questions,
            self.shuffle_options,
            self.show_correct_answers,
            self.allow_review,
            self.time_limit,
            self.passing_score,
        )
        .map_err(|_| TransferError::MalformedData)
    }
}

//
// ─── SHARE LINKS ───────────────────────────────────────────────────────────────
//

/// Encode a quiz as an opaque, URL-safe share payload.
///
/// # Errors
///
/// Returns `TransferError::MalformedData` if serialization or
/// compression fails.
pub fn encode_share_data(quiz: &Quiz) -> Result<String, TransferError> {
    let json = serde_json::to_vec(&QuizDto::from_quiz(quiz))
        .map_err(|_| TransferError::MalformedData)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .and_then(|()| encoder.finish())
        .map(|compressed| URL_SAFE_NO_PAD.encode(compressed))
        .map_err(|_| TransferError::MalformedData)
}

/// Decode a share payload back into a quiz.
///
/// Returns `None` for anything that does not decode cleanly: bad base64,
/// bad compression, or JSON that does not describe a valid quiz. Shared
/// ids and timestamps are kept; importing is a separate step.
#[must_use]
pub fn decode_share_data(data: &str) -> Option<Quiz> {
    let compressed = URL_SAFE_NO_PAD.decode(data).ok()?;
    let mut decoder = DeflateDecoder::new(Vec::new());
    decoder.write_all(&compressed).ok()?;
    let json = decoder.finish().ok()?;
    let dto: QuizDto = serde_json::from_slice(&json).ok()?;
    let id = QuizId::new(dto.id.clone());
    let created_at = dto.created_at;
    let updated_at = dto.updated_at;
    dto.into_quiz(id, created_at, updated_at).ok()
}

//
// ─── CSV EXPORT ────────────────────────────────────────────────────────────────
//

/// Render results as CSV with one row per attempt; empty input yields an
/// empty string.
#[must_use]
pub fn export_results_csv(results: &[QuizResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let mut lines = vec![
        "Date,Quiz ID,Score,Total Points,Percentage,Passed,Duration".to_owned(),
    ];
    for result in results {
        let percentage = if result.total_points() == 0 {
            0.0
        } else {
            f64::from(result.score()) / f64::from(result.total_points()) * 100.0
        };
        lines.push(format!(
            "{},{},{},{},{percentage:.1},{},{}",
            result.ended_at().format("%Y-%m-%d"),
            result.quiz_id(),
            result.score(),
            result.total_points(),
            if result.passed() { "Yes" } else { "No" },
            result.duration_secs(),
        ));
    }
    lines.join("\n")
}

//
// ─── TRANSFER SERVICE ──────────────────────────────────────────────────────────
//

/// Import and export against stored quizzes.
#[derive(Clone)]
pub struct TransferService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
}

impl TransferService {
    #[must_use]
    pub fn new(clock: Clock, quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { clock, quizzes }
    }

    /// Export one quiz as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` when the quiz does not exist.
    /// Returns `TransferError::Storage` if repository access fails.
    pub async fn export_quiz(&self, quiz_id: &QuizId) -> Result<String, TransferError> {
        let quiz = self
            .quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or(TransferError::NotFound)?;
        serde_json::to_string_pretty(&QuizDto::from_quiz(&quiz))
            .map_err(|_| TransferError::MalformedData)
    }

    /// Export every stored quiz as one pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::Storage` if repository access fails.
    pub async fn export_all(&self) -> Result<String, TransferError> {
        let quizzes = self.quizzes.list_quizzes(u32::MAX).await?;
        let dtos: Vec<QuizDto> = quizzes.iter().map(QuizDto::from_quiz).collect();
        serde_json::to_string_pretty(&dtos).map_err(|_| TransferError::MalformedData)
    }

    /// Import a quiz from JSON and persist it under a fresh id.
    ///
    /// The imported copy gets new timestamps; question ids are kept as
    /// they came. Any parse or validation problem reports the same
    /// generic error, never partial state.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::MalformedData` for bad input.
    /// Returns `TransferError::Storage` if persistence fails.
    pub async fn import_quiz(&self, json: &str) -> Result<Quiz, TransferError> {
        let dto: QuizDto =
            serde_json::from_str(json).map_err(|_| TransferError::MalformedData)?;
        let now = self.clock.now();
        let quiz = dto.into_quiz(QuizId::generate(), now, now)?;
        self.quizzes.upsert_quiz(&quiz).await?;
        Ok(quiz)
    }
}
