use async_trait::async_trait;

use super::{store_err, SqliteSession};
use crate::db::models::{PendingOrder, Player};
use crate::db::repo::GameRepo;
use crate::error::StoreError;

#[async_trait]
impl GameRepo for SqliteSession {
    async fn create_round_batch(&mut self, tg_id: i64, amount: i64) -> Result<u64, StoreError> {
        let inserted = sqlx::query(
            "INSERT INTO round (question_id, player_id)
             SELECT q.id, ?1
               FROM question q
              WHERE q.active = 1
                AND NOT EXISTS (
                      SELECT 1 FROM round r
                       WHERE r.player_id = ?1
                         AND r.question_id = q.id
                         AND r.asked = 0)
              ORDER BY RANDOM()
              LIMIT ?2",
        )
        .bind(tg_id)
        .bind(amount)
        .execute(&mut *self.tx)
        .await;

        match inserted {
            Ok(done) => Ok(done.rows_affected()),
            Err(e) => {
                log::error!("error creating rounds for player {tg_id}: {e}");
                Err(store_err(e))
            }
        }
    }

    async fn delete_answered_rounds(&mut self, tg_id: i64) -> Result<u64, StoreError> {
        let done = sqlx::query("DELETE FROM round WHERE player_id = ? AND asked = 1")
            .bind(tg_id)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;
        Ok(done.rows_affected())
    }

    async fn next_pending_question(
        &mut self,
        tg_id: i64,
        order: PendingOrder,
    ) -> Result<Option<i64>, StoreError> {
        let sql = format!(
            "SELECT question_id FROM round WHERE player_id = ? AND asked = 0 ORDER BY id {} LIMIT 1",
            order.direction()
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(tg_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn mark_answered(&mut self, question_id: i64, tg_id: i64) -> Result<u64, StoreError> {
        let done = sqlx::query(
            "UPDATE round SET asked = 1 WHERE player_id = ? AND question_id = ? AND asked = 0",
        )
            .bind(tg_id)
            .bind(question_id)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;
        Ok(done.rows_affected())
    }

    async fn ensure_player(&mut self, tg_id: i64) -> Result<Option<Player>, StoreError> {
        sqlx::query("INSERT INTO player (tg_id) VALUES (?) ON CONFLICT (tg_id) DO NOTHING")
            .bind(tg_id)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;

        sqlx::query_as::<_, Player>("SELECT id, tg_id, score FROM player WHERE tg_id = ?")
            .bind(tg_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn increment_score(&mut self, tg_id: i64) -> Result<Option<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE player SET score = score + 1 WHERE tg_id = ? RETURNING score",
        )
        .bind(tg_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_err)
    }

    async fn score_of(&mut self, tg_id: i64) -> Result<Option<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT score FROM player WHERE tg_id = ?")
            .bind(tg_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)
    }
}
