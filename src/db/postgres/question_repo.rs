use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Connection, Postgres, QueryBuilder};

use super::{store_err, PgSession};
use crate::db::models::{
    attach_answers, Answer, Edit, NewQuestion, Question, QuestionFilter, QuestionPatch,
    QuestionWithAnswers,
};
use crate::db::repo::QuestionRepo;
use crate::error::StoreError;

impl PgSession {
    async fn answers_for(&mut self, question_ids: &[i64]) -> Result<Vec<Answer>, StoreError> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Answer>(
            "SELECT id, text, correct, question_id
               FROM answer
              WHERE question_id = ANY($1)
              ORDER BY id",
        )
        .bind(question_ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(store_err)
    }
}

/// `SELECT ... FROM question WHERE <filter>`; ordering and paging are left
/// to the caller.
fn filtered_questions(filter: &QuestionFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT id, text, active, updated_dt FROM question WHERE active = ");
    qb.push_bind(filter.active);
    if let Some(pattern) = filter.text_pattern() {
        qb.push(" AND text ILIKE ").push_bind(pattern);
    }
    qb
}

fn push_order_and_page(qb: &mut QueryBuilder<'static, Postgres>, filter: &QuestionFilter) {
    if let Some(order) = filter.order_by() {
        qb.push(order.order_clause());
    }
    qb.push(" LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);
}

#[async_trait]
impl QuestionRepo for PgSession {
    async fn add_question(&mut self, question: &NewQuestion) -> Option<i64> {
        let mut sp = match Connection::begin(&mut *self.tx).await {
            Ok(sp) => sp,
            Err(e) => {
                log::error!("error adding question: {e}");
                return None;
            }
        };

        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO question (text, active, updated_dt)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(&question.text)
        .bind(question.active)
        .bind(Utc::now())
        .fetch_one(&mut *sp)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(e) => {
                log::error!("error adding question: {e}");
                sp.rollback().await.ok();
                return None;
            }
        };
        if let Err(e) = sp.commit().await {
            log::error!("error adding question: {e}");
            return None;
        }
        log::info!("added question {id}");
        Some(id)
    }

    async fn remove_question(&mut self, id: i64) -> Result<u64, StoreError> {
        let done = sqlx::query("DELETE FROM question WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;
        Ok(done.rows_affected())
    }

    async fn edit_question(
        &mut self,
        id: i64,
        patch: &QuestionPatch,
    ) -> Result<Edit<Question>, StoreError> {
        if patch.is_empty() {
            return Ok(Edit::Noop);
        }

        let current = sqlx::query_as::<_, Question>(
            "SELECT id, text, active, updated_dt FROM question WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_err)?;

        let Some(mut question) = current else {
            return Ok(Edit::NotFound);
        };
        patch.apply(&mut question);
        question.updated_dt = Utc::now();

        sqlx::query("UPDATE question SET text = $2, active = $3, updated_dt = $4 WHERE id = $1")
            .bind(question.id)
            .bind(&question.text)
            .bind(question.active)
            .bind(question.updated_dt)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;

        Ok(Edit::Edited(question))
    }

    async fn question_by_id(&mut self, id: i64) -> Result<Option<QuestionWithAnswers>, StoreError> {
        let question = sqlx::query_as::<_, Question>(
            "SELECT id, text, active, updated_dt FROM question WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_err)?;

        let Some(question) = question else {
            return Ok(None);
        };
        let answers = self.answers_for(&[question.id]).await?;
        Ok(attach_answers(vec![question], answers).pop())
    }

    async fn question_exists(&mut self, id: i64) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM question WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn list_questions(&mut self, filter: &QuestionFilter) -> Result<Vec<Question>, StoreError> {
        let mut qb = filtered_questions(filter);
        push_order_and_page(&mut qb, filter);
        qb.build_query_as::<Question>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn list_questions_with_answers(
        &mut self,
        filter: &QuestionFilter,
    ) -> Result<Vec<QuestionWithAnswers>, StoreError> {
        let mut qb = filtered_questions(filter);
        if let Some(question_id) = filter.question_id {
            qb.push(" AND id = ").push_bind(question_id);
        }
        push_order_and_page(&mut qb, filter);

        let questions = qb
            .build_query_as::<Question>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(store_err)?;
        let ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let answers = self.answers_for(&ids).await?;
        Ok(attach_answers(questions, answers))
    }
}
