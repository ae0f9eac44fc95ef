//! SQLite backend, used for local runs and the test suite.

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Duration;

use super::{Backend, Session};
use crate::config::DatabaseConfig;
use crate::error::StoreError;

mod answer_repo;
mod cursor_repo;
mod game_repo;
mod question_repo;
mod user_repo;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS question (
         id         INTEGER PRIMARY KEY AUTOINCREMENT,
         text       TEXT,
         active     BOOLEAN NOT NULL DEFAULT 1,
         updated_dt TEXT NOT NULL
     )",
    "CREATE TABLE IF NOT EXISTS answer (
         id          INTEGER PRIMARY KEY AUTOINCREMENT,
         text        VARCHAR(255),
         correct     BOOLEAN NOT NULL DEFAULT 0,
         question_id INTEGER NOT NULL REFERENCES question(id) ON DELETE CASCADE
     )",
    "CREATE TABLE IF NOT EXISTS player (
         id    INTEGER PRIMARY KEY AUTOINCREMENT,
         tg_id INTEGER NOT NULL UNIQUE,
         score INTEGER NOT NULL DEFAULT 0 CHECK (score >= 0)
     )",
    "CREATE TABLE IF NOT EXISTS round (
         id          INTEGER PRIMARY KEY AUTOINCREMENT,
         asked       BOOLEAN NOT NULL DEFAULT 0,
         question_id INTEGER NOT NULL REFERENCES question(id) ON DELETE CASCADE,
         player_id   INTEGER NOT NULL REFERENCES player(tg_id) ON DELETE CASCADE
     )",
    r#"CREATE TABLE IF NOT EXISTS "user" (
         id       INTEGER PRIMARY KEY AUTOINCREMENT,
         username VARCHAR(255) NOT NULL UNIQUE,
         password VARCHAR(255) NOT NULL,
         active   BOOLEAN NOT NULL DEFAULT 1
     )"#,
    "CREATE TABLE IF NOT EXISTS tg_update (
         id INTEGER PRIMARY KEY
     )",
];

pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub async fn connect(cfg: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&cfg.url)
            .map_err(StoreError::Database)?
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.acquire_timeout)
            .max_lifetime(cfg.max_lifetime)
            .connect_with(options)
            .await
            .map_err(StoreError::Database)?;
        Ok(SqliteBackend { pool })
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn begin(&self) -> Result<Box<dyn Session>, StoreError> {
        let tx = self.pool.begin().await.map_err(store_err)?;
        Ok(Box::new(SqliteSession { tx }))
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
        log::info!("sqlite schema ready");
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

/// A request's transaction on SQLite.
pub struct SqliteSession {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl Session for SqliteSession {
    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(store_err)
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.rollback().await.map_err(store_err)
    }
}

/// SQLite has no detail line; the message names the constraint
/// (`UNIQUE constraint failed: player.tg_id`).
pub(crate) fn store_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if matches!(
            db_err.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ) {
            return StoreError::Constraint {
                detail: db_err.message().to_string(),
            };
        }
    }
    StoreError::Database(err)
}
