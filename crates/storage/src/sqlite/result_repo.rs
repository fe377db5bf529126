use quiz_core::model::{QuizId, QuizResult, ResultId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{answers_from_json, answers_to_json, ser};
use crate::repository::{ResultRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl ResultRepository for SqliteRepository {
    async fn insert_result(&self, result: &QuizResult) -> Result<(), StorageError> {
        let answers = answers_to_json(result.answers())?;
        let outcome = sqlx::query(
            r"
            INSERT OR IGNORE INTO results (id, quiz_id, answers, score, total_points,
                                           started_at, ended_at, passed)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(result.id().as_str())
        .bind(result.quiz_id().as_str())
        .bind(answers)
        .bind(i64::from(result.score()))
        .bind(i64::from(result.total_points()))
        .bind(result.started_at())
        .bind(result.ended_at())
        .bind(i64::from(result.passed()))
        .execute(self.pool())
        .await
        .map_err(conn)?;

        if outcome.rows_affected() == 0 {
            return Err(StorageError::Conflict);
        }
        Ok(())
    }

    async fn get_result(&self, id: &ResultId) -> Result<Option<QuizResult>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, quiz_id, answers, score, total_points, started_at, ended_at, passed
            FROM results WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(conn)?;

        row.as_ref().map(result_from_row).transpose()
    }

    async fn results_for_quiz(&self, quiz_id: &QuizId) -> Result<Vec<QuizResult>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, quiz_id, answers, score, total_points, started_at, ended_at, passed
            FROM results
            WHERE quiz_id = ?1
            ORDER BY ended_at DESC
            ",
        )
        .bind(quiz_id.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        rows.iter().map(result_from_row).collect()
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<QuizResult>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, quiz_id, answers, score, total_points, started_at, ended_at, passed
            FROM results
            ORDER BY ended_at DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        rows.iter().map(result_from_row).collect()
    }
}

fn result_from_row(row: &SqliteRow) -> Result<QuizResult, StorageError> {
    let answers_json: String = row.try_get("answers").map_err(ser)?;
    let answers = answers_from_json(&answers_json)?;

    let score_i64: i64 = row.try_get("score").map_err(ser)?;
    let score = u32::try_from(score_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid score: {score_i64}")))?;
    let total_i64: i64 = row.try_get("total_points").map_err(ser)?;
    let total_points = u32::try_from(total_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid total_points: {total_i64}")))?;

    QuizResult::new(
        ResultId::new(row.try_get::<String, _>("id").map_err(ser)?),
        QuizId::new(row.try_get::<String, _>("quiz_id").map_err(ser)?),
        answers,
        score,
        total_points,
        row.try_get("started_at").map_err(ser)?,
        row.try_get("ended_at").map_err(ser)?,
        row.try_get::<i64, _>("passed").map_err(ser)? != 0,
    )
    .map_err(|e| StorageError::Serialization(e.to_string()))
}
