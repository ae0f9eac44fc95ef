//! Quiz / trivia backend: questions and answers, per-player rounds and
//! scores, and the Telegram update cursor.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod service;
