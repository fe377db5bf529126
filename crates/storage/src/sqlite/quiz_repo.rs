use quiz_core::model::{Quiz, QuizId, QuizSettings};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::SqliteRepository;
use super::mapping::{kind_columns, map_question_row, ser};
use crate::repository::{QuizRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let settings = quiz.settings();
        let mut tx = self.pool().begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO quizzes (id, title, description, shuffle_questions, shuffle_options,
                                 show_correct_answers, allow_review, time_limit_minutes,
                                 passing_score_percent, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                shuffle_questions = excluded.shuffle_questions,
                shuffle_options = excluded.shuffle_options,
                show_correct_answers = excluded.show_correct_answers,
                allow_review = excluded.allow_review,
                time_limit_minutes = excluded.time_limit_minutes,
                passing_score_percent = excluded.passing_score_percent,
                updated_at = excluded.updated_at
            ",
        )
        .bind(quiz.id().as_str())
        .bind(quiz.title())
        .bind(quiz.description())
        .bind(i64::from(settings.shuffle_questions()))
        .bind(i64::from(settings.shuffle_options()))
        .bind(i64::from(settings.show_correct_answers()))
        .bind(i64::from(settings.allow_review()))
        .bind(settings.time_limit_minutes().map(i64::from))
        .bind(settings.passing_score_percent().map(i64::from))
        .bind(quiz.created_at())
        .bind(quiz.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        // Replace the question set wholesale; positions encode order.
        sqlx::query("DELETE FROM questions WHERE quiz_id = ?1")
            .bind(quiz.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, question) in quiz.questions().iter().enumerate() {
            let columns = kind_columns(question.kind())?;
            sqlx::query(
                r"
                INSERT INTO questions (id, quiz_id, position, kind, prompt, options,
                                       correct_index, correct_bool, correct_text,
                                       explanation, points, time_limit_secs)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
                ",
            )
            .bind(question.id().as_str())
            .bind(quiz.id().as_str())
            .bind(i64::try_from(position).map_err(ser)?)
            .bind(question.kind().tag())
            .bind(question.prompt())
            .bind(columns.options_json)
            .bind(columns.correct_index)
            .bind(columns.correct_bool)
            .bind(columns.correct_text)
            .bind(question.explanation())
            .bind(i64::from(question.points()))
            .bind(question.time_limit_secs().map(i64::from))
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, shuffle_questions, shuffle_options,
                   show_correct_answers, allow_review, time_limit_minutes,
                   passing_score_percent, created_at, updated_at
            FROM quizzes WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(conn)?;

        match row {
            Some(row) => self.quiz_from_row(&row).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list_quizzes(&self, limit: u32) -> Result<Vec<Quiz>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, shuffle_questions, shuffle_options,
                   show_correct_answers, allow_review, time_limit_minutes,
                   passing_score_percent, created_at, updated_at
            FROM quizzes
            ORDER BY updated_at DESC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        let mut quizzes = Vec::with_capacity(rows.len());
        for row in rows {
            quizzes.push(self.quiz_from_row(&row).await?);
        }
        Ok(quizzes)
    }

    async fn delete_quiz(&self, id: &QuizId) -> Result<(), StorageError> {
        // Results go with the quiz via ON DELETE CASCADE.
        sqlx::query("DELETE FROM quizzes WHERE id = ?1")
            .bind(id.as_str())
            .execute(self.pool())
            .await
            .map_err(conn)?;
        Ok(())
    }
}

impl SqliteRepository {
    async fn quiz_from_row(&self, row: &SqliteRow) -> Result<Quiz, StorageError> {
        let id: String = row.try_get("id").map_err(ser)?;

        let question_rows = sqlx::query(
            r"
            SELECT id, kind, prompt, options, correct_index, correct_bool,
                   correct_text, explanation, points, time_limit_secs
            FROM questions
            WHERE quiz_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(id.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(conn)?;

        let mut questions = Vec::with_capacity(question_rows.len());
        for question_row in &question_rows {
            questions.push(map_question_row(question_row)?);
        }

        let time_limit_minutes = row
            .try_get::<Option<i64>, _>("time_limit_minutes")
            .map_err(ser)?
            .map(u32::try_from)
            .transpose()
            .map_err(|_| StorageError::Serialization("time_limit_minutes overflow".into()))?;
        let passing_score_percent = row
            .try_get::<Option<i64>, _>("passing_score_percent")
            .map_err(ser)?
            .map(u8::try_from)
            .transpose()
            .map_err(|_| StorageError::Serialization("passing_score_percent overflow".into()))?;

        let settings = QuizSettings::new(
            row.try_get::<i64, _>("shuffle_questions").map_err(ser)? != 0,
            row.try_get::<i64, _>("shuffle_options").map_err(ser)? != 0,
            row.try_get::<i64, _>("show_correct_answers").map_err(ser)? != 0,
            row.try_get::<i64, _>("allow_review").map_err(ser)? != 0,
            time_limit_minutes,
            passing_score_percent,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

        Quiz::new(
            QuizId::new(id),
            row.try_get::<String, _>("title").map_err(ser)?,
            row.try_get::<Option<String>, _>("description").map_err(ser)?,
            questions,
            settings,
            row.try_get("created_at").map_err(ser)?,
            row.try_get("updated_at").map_err(ser)?,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}
