//! Runtime configuration for the quiz server.
//!
//! Built once in `main` and handed to whatever needs it. Nothing here is
//! global.

use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

use crate::db::models::PendingOrder;

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub server_addr: String,
    pub database: DatabaseConfig,
    pub game: GameSettings,
    /// Shared secret for the bot-facing routes (`X-Api-Key`).
    pub api_key: Option<String>,
    /// Log to `logs.log` instead of stderr.
    pub debug: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Connections older than this are recycled.
    pub max_lifetime: Duration,
    /// Create the schema on start-up.
    pub migrate: bool,
}

#[derive(Debug, Clone)]
pub struct GameSettings {
    /// Default number of rounds handed out per batch.
    pub round_size: i64,
    pub pending_order: PendingOrder,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            round_size: 5,
            pending_order: PendingOrder::Oldest,
        }
    }
}

impl DatabaseConfig {
    /// Pool settings matching the server defaults, for an explicit URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        DatabaseConfig {
            url: url.into(),
            max_connections: 5,
            acquire_timeout: Duration::from_secs(20),
            max_lifetime: Duration::from_secs(280),
            migrate: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => url_from_parts(&lookup)?,
        };

        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5u32)?;
        let acquire_timeout = Duration::from_secs(parse_or(&lookup, "DB_POOL_TIMEOUT", 20u64)?);
        let max_lifetime = Duration::from_secs(parse_or(&lookup, "DB_POOL_RECYCLE", 280u64)?);
        let migrate = parse_or(&lookup, "DB_MIGRATE", true)?;

        let round_size = parse_or(&lookup, "ROUND_SIZE", 5i64)?;
        if round_size <= 0 {
            bail!("ROUND_SIZE must be positive, got {round_size}");
        }
        let pending_order = match lookup("PENDING_ORDER") {
            Some(raw) => PendingOrder::from_key(&raw)
                .with_context(|| format!("PENDING_ORDER must be `oldest` or `newest`, got `{raw}`"))?,
            None => PendingOrder::Oldest,
        };

        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8000".into());
        let api_key = lookup("KEY").filter(|k| !k.is_empty());
        let debug = lookup("DEBUG").is_some_and(|v| !v.is_empty());

        Ok(Config {
            server_addr,
            database: DatabaseConfig {
                url,
                max_connections,
                acquire_timeout,
                max_lifetime,
                migrate,
            },
            game: GameSettings {
                round_size,
                pending_order,
            },
            api_key,
            debug,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {key}={raw}: {e}")),
        None => Ok(default),
    }
}

/// `DB_DRIVER` may carry a dialect suffix (`postgresql+asyncpg`); only the
/// part before `+` picks the scheme.
fn url_from_parts<F>(lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let driver = lookup("DB_DRIVER").context("DATABASE_URL or DB_DRIVER must be set")?;
    let scheme = driver.split('+').next().unwrap_or_default();

    if scheme == "sqlite" {
        let name = lookup("DB_NAME").context("DB_NAME must be set for sqlite")?;
        return Ok(format!("sqlite://{name}?mode=rwc"));
    }

    let require = |key: &str| lookup(key).with_context(|| format!("{key} must be set"));
    let user = require("DB_USERNAME")?;
    let password = require("DB_PASSWORD")?;
    let host = require("DB_HOST")?;
    let port: u16 = parse_or(lookup, "DB_PORT", 5432u16)?;
    let name = require("DB_NAME")?;

    Ok(format!("{scheme}://{user}:{password}@{host}:{port}/{name}"))
}
