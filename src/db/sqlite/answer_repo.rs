use async_trait::async_trait;
use sqlx::Connection;

use super::{store_err, SqliteSession};
use crate::db::models::{Answer, NewAnswer};
use crate::db::repo::AnswerRepo;
use crate::error::StoreError;

#[async_trait]
impl AnswerRepo for SqliteSession {
    async fn add_answer(&mut self, answer: &NewAnswer) -> Result<i64, StoreError> {
        let mut sp = Connection::begin(&mut *self.tx).await.map_err(store_err)?;

        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO answer (text, correct, question_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&answer.text)
        .bind(answer.correct)
        .bind(answer.question_id)
        .fetch_one(&mut *sp)
        .await;

        match inserted {
            Ok(id) => {
                sp.commit().await.map_err(store_err)?;
                log::info!("added answer {id}");
                Ok(id)
            }
            Err(e) => {
                log::error!("error adding answer: {e}");
                sp.rollback().await.ok();
                Err(store_err(e))
            }
        }
    }

    async fn remove_answer(&mut self, id: i64) -> Result<u64, StoreError> {
        let done = sqlx::query("DELETE FROM answer WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;
        Ok(done.rows_affected())
    }

    async fn answer_by_id(&mut self, id: i64) -> Result<Option<Answer>, StoreError> {
        sqlx::query_as::<_, Answer>("SELECT id, text, correct, question_id FROM answer WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn answers_for_question(&mut self, question_id: i64) -> Result<Vec<Answer>, StoreError> {
        sqlx::query_as::<_, Answer>(
            "SELECT id, text, correct, question_id FROM answer WHERE question_id = ? ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(store_err)
    }

    async fn correct_answers_for_question(
        &mut self,
        question_id: i64,
    ) -> Result<Vec<Answer>, StoreError> {
        sqlx::query_as::<_, Answer>(
            "SELECT id, text, correct, question_id
               FROM answer
              WHERE question_id = ? AND correct = 1
              ORDER BY id",
        )
        .bind(question_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(store_err)
    }
}
