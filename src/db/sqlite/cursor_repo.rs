use async_trait::async_trait;

use super::{store_err, SqliteSession};
use crate::db::repo::TelegramCursorRepo;
use crate::error::StoreError;

#[async_trait]
impl TelegramCursorRepo for SqliteSession {
    async fn last_update_id(&mut self) -> Result<Option<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT id FROM tg_update ORDER BY id DESC LIMIT 1")
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn set_last_update_id(&mut self, id: i64) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM tg_update")
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;
        sqlx::query("INSERT INTO tg_update (id) VALUES (?)")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}
