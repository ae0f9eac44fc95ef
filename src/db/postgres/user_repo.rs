use async_trait::async_trait;

use super::{store_err, PgSession};
use crate::db::models::{User, UserSummary};
use crate::db::repo::UserRepo;
use crate::error::StoreError;

#[async_trait]
impl UserRepo for PgSession {
    async fn put_user(
        &mut self,
        username: &str,
        password_hash: &str,
    ) -> Result<Option<i64>, StoreError> {
        sqlx::query_scalar::<_, i64>(
            r#"INSERT INTO "user" (username, password)
               VALUES ($1, $2)
               ON CONFLICT (username) DO NOTHING
               RETURNING id"#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_err)
    }

    async fn user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"SELECT id, username, password, active FROM "user" WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(store_err)
    }

    async fn list_users(&mut self) -> Result<Vec<UserSummary>, StoreError> {
        sqlx::query_as::<_, UserSummary>(r#"SELECT id, username, active FROM "user" ORDER BY id"#)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(store_err)
    }

    async fn remove_user(&mut self, id: i64) -> Result<u64, StoreError> {
        let done = sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(store_err)?;
        Ok(done.rows_affected())
    }
}
