use quiz_core::grading::AnswerMap;
use quiz_core::model::{Question, QuestionId, QuestionKind};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Splits a question's answer key into the per-variant columns.
pub(crate) struct KindColumns {
    pub options_json: Option<String>,
    pub correct_index: Option<i64>,
    pub correct_bool: Option<i64>,
    pub correct_text: Option<String>,
}

pub(crate) fn kind_columns(kind: &QuestionKind) -> Result<KindColumns, StorageError> {
    let mut columns = KindColumns {
        options_json: None,
        correct_index: None,
        correct_bool: None,
        correct_text: None,
    };
    match kind {
        QuestionKind::MultipleChoice {
            options,
            correct_index,
        } => {
            columns.options_json = Some(serde_json::to_string(options).map_err(ser)?);
            columns.correct_index = Some(i64::try_from(*correct_index).map_err(ser)?);
        }
        QuestionKind::TrueFalse { correct_value } => {
            columns.correct_bool = Some(i64::from(*correct_value));
        }
        QuestionKind::ShortAnswer { correct_text } => {
            columns.correct_text = Some(correct_text.clone());
        }
        QuestionKind::Essay => {}
    }
    Ok(columns)
}

pub(crate) fn parse_kind(row: &SqliteRow) -> Result<QuestionKind, StorageError> {
    let tag: String = row.try_get("kind").map_err(ser)?;
    match tag.as_str() {
        "multiple-choice" => {
            let options_json: String = row
                .try_get::<Option<String>, _>("options")
                .map_err(ser)?
                .ok_or_else(|| StorageError::Serialization("missing options".into()))?;
            let options: Vec<String> = serde_json::from_str(&options_json).map_err(ser)?;
            let correct_index: i64 = row
                .try_get::<Option<i64>, _>("correct_index")
                .map_err(ser)?
                .ok_or_else(|| StorageError::Serialization("missing correct_index".into()))?;
            Ok(QuestionKind::MultipleChoice {
                options,
                correct_index: usize::try_from(correct_index).map_err(ser)?,
            })
        }
        "true-false" => {
            let correct_bool: i64 = row
                .try_get::<Option<i64>, _>("correct_bool")
                .map_err(ser)?
                .ok_or_else(|| StorageError::Serialization("missing correct_bool".into()))?;
            Ok(QuestionKind::TrueFalse {
                correct_value: correct_bool != 0,
            })
        }
        "short-answer" => {
            let correct_text: String = row
                .try_get::<Option<String>, _>("correct_text")
                .map_err(ser)?
                .ok_or_else(|| StorageError::Serialization("missing correct_text".into()))?;
            Ok(QuestionKind::ShortAnswer { correct_text })
        }
        "essay" => Ok(QuestionKind::Essay),
        other => Err(StorageError::Serialization(format!(
            "invalid question kind: {other}"
        ))),
    }
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let kind = parse_kind(row)?;

    let points_i64: i64 = row.try_get("points").map_err(ser)?;
    let points = u32::try_from(points_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid points: {points_i64}")))?;

    let time_limit_secs = row
        .try_get::<Option<i64>, _>("time_limit_secs")
        .map_err(ser)?
        .map(u32::try_from)
        .transpose()
        .map_err(|_| StorageError::Serialization("time_limit_secs overflow".into()))?;

    Question::new(
        QuestionId::new(id),
        row.try_get::<String, _>("prompt").map_err(ser)?,
        kind,
        points,
        row.try_get::<Option<String>, _>("explanation").map_err(ser)?,
        time_limit_secs,
    )
    .map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn answers_to_json(answers: &AnswerMap) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn answers_from_json(json: &str) -> Result<AnswerMap, StorageError> {
    serde_json::from_str(json).map_err(ser)
}
