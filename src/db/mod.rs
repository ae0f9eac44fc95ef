//! Storage layer: backend selection, per-request sessions and repositories.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::error::StoreError;

pub mod models;
pub mod postgres;
pub mod repo;
pub mod sqlite;

pub use repo::{AnswerRepo, GameRepo, QuestionRepo, TelegramCursorRepo, UserRepo};

/// A connected database. Chosen once in [`connect`].
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Opens the transaction a request works in.
    async fn begin(&self) -> Result<Box<dyn Session>, StoreError>;

    /// Creates any missing tables.
    async fn migrate(&self) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

/// One open transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait Session: QuestionRepo + AnswerRepo + GameRepo + TelegramCursorRepo + UserRepo {
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Picks the backend from the URL scheme and opens its pool.
pub async fn connect(cfg: &DatabaseConfig) -> Result<Arc<dyn Backend>, StoreError> {
    let scheme = cfg.url.split(':').next().unwrap_or_default();
    let backend: Arc<dyn Backend> = match scheme {
        "postgres" | "postgresql" => Arc::new(postgres::PgBackend::connect(cfg).await?),
        "sqlite" => Arc::new(sqlite::SqliteBackend::connect(cfg).await?),
        _ => return Err(StoreError::UnsupportedBackend(redact(&cfg.url))),
    };
    log::info!("connected to {} backend", backend.name());
    Ok(backend)
}

/// Drops credentials from a URL before it ends up in an error.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(start), Some(at)) if at > start => format!("{}://***{}", &url[..start], &url[at..]),
        _ => url.to_string(),
    }
}
