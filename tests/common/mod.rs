#![allow(dead_code)]

use std::sync::Arc;

use quiz_server::config::DatabaseConfig;
use quiz_server::db::models::{NewAnswer, NewQuestion};
use quiz_server::db::{self, AnswerRepo, Backend, QuestionRepo, Session};
use tempfile::TempDir;

/// A migrated SQLite database living in its own temp dir.
pub struct TestDb {
    pub backend: Arc<dyn Backend>,
    _dir: TempDir,
}

pub async fn sqlite() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("quiz.db");
    let mut cfg = DatabaseConfig::with_url(format!("sqlite://{}?mode=rwc", path.display()));
    cfg.max_connections = 1;

    let backend = db::connect(&cfg).await.expect("connect sqlite");
    backend.migrate().await.expect("migrate");
    TestDb { backend, _dir: dir }
}

pub fn question(text: &str, active: bool) -> NewQuestion {
    NewQuestion {
        text: text.to_string(),
        active,
    }
}

pub fn answer(question_id: i64, text: &str, correct: bool) -> NewAnswer {
    NewAnswer {
        text: text.to_string(),
        correct,
        question_id,
    }
}

/// Adds `n` active questions, one correct answer each, and returns their ids.
pub async fn seed_questions(session: &mut dyn Session, n: usize) -> Vec<i64> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = session
            .add_question(&question(&format!("question {i}"), true))
            .await
            .expect("question added");
        session
            .add_answer(&answer(id, "right", true))
            .await
            .expect("answer added");
        ids.push(id);
    }
    ids
}
