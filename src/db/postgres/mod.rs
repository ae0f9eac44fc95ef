//! Postgres backend.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgDatabaseError, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};

use super::{Backend, Session};
use crate::config::DatabaseConfig;
use crate::error::StoreError;

mod answer_repo;
mod cursor_repo;
mod game_repo;
mod question_repo;
mod user_repo;

const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS question (
           id         BIGSERIAL PRIMARY KEY,
           text       TEXT,
           active     BOOLEAN NOT NULL DEFAULT TRUE,
           updated_dt TIMESTAMPTZ NOT NULL DEFAULT TIMEZONE('utc', now())
       )"#,
    r#"CREATE TABLE IF NOT EXISTS answer (
           id          BIGSERIAL PRIMARY KEY,
           text        VARCHAR(255),
           correct     BOOLEAN NOT NULL DEFAULT FALSE,
           question_id BIGINT NOT NULL REFERENCES question(id) ON DELETE CASCADE
       )"#,
    r#"CREATE TABLE IF NOT EXISTS player (
           id    BIGSERIAL PRIMARY KEY,
           tg_id BIGINT NOT NULL UNIQUE,
           score BIGINT NOT NULL DEFAULT 0 CHECK (score >= 0)
       )"#,
    r#"CREATE TABLE IF NOT EXISTS round (
           id          BIGSERIAL PRIMARY KEY,
           asked       BOOLEAN NOT NULL DEFAULT FALSE,
           question_id BIGINT NOT NULL REFERENCES question(id) ON DELETE CASCADE,
           player_id   BIGINT NOT NULL REFERENCES player(tg_id) ON DELETE CASCADE
       )"#,
    r#"CREATE TABLE IF NOT EXISTS "user" (
           id       BIGSERIAL PRIMARY KEY,
           username VARCHAR(255) NOT NULL UNIQUE,
           password VARCHAR(255) NOT NULL,
           active   BOOLEAN NOT NULL DEFAULT TRUE
       )"#,
    r#"CREATE TABLE IF NOT EXISTS tg_update (
           id BIGINT PRIMARY KEY
       )"#,
];

pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout)
            .max_lifetime(cfg.max_lifetime)
            .connect(&cfg.url)
            .await
            .map_err(StoreError::Database)?;
        Ok(PgBackend { pool })
    }
}

#[async_trait]
impl Backend for PgBackend {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn begin(&self) -> Result<Box<dyn Session>, StoreError> {
        let tx = self.pool.begin().await.map_err(store_err)?;
        Ok(Box::new(PgSession { tx }))
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_err)?;
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(store_err)?;
        }
        tx.commit().await.map_err(store_err)?;
        log::info!("postgres schema ready");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_err)?;
        Ok(())
    }
}

/// A request's transaction on Postgres.
pub struct PgSession {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Session for PgSession {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(store_err)
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(store_err)
    }
}

/// Constraint violations keep Postgres' `DETAIL` line (e.g.
/// `Key (question_id)=(7) is not present in table "question".`).
pub(crate) fn store_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(
            db_err.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ) {
            let detail = db_err
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(|e| e.detail())
                .unwrap_or_else(|| db_err.message())
                .to_string();
            return StoreError::Constraint { detail };
        }
    }
    StoreError::Database(err)
}
