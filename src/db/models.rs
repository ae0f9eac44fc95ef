use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub text: Option<String>,
    pub active: bool,
    pub updated_dt: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: i64,
    pub text: Option<String>,
    pub correct: bool,
    pub question_id: i64,
}

/// A question with its answers loaded eagerly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionWithAnswers {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Player {
    pub id: i64,
    pub tg_id: i64,
    pub score: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string.
    pub password: String,
    pub active: bool,
}

/// What the user listing exposes; never the hash.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAnswer {
    pub text: String,
    #[serde(default)]
    pub correct: bool,
    pub question_id: i64,
}

/// Partial update for a question. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionPatch {
    pub text: Option<String>,
    pub active: Option<bool>,
}

impl QuestionPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.active.is_none()
    }

    /// Applies the provided fields; returns whether anything was set.
    pub fn apply(&self, question: &mut Question) -> bool {
        let mut changed = false;
        if let Some(text) = &self.text {
            question.text = Some(text.clone());
            changed = true;
        }
        if let Some(active) = self.active {
            question.active = active;
            changed = true;
        }
        changed
    }
}

/// Result of an edit that may have nothing to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit<T> {
    Edited(T),
    NotFound,
    /// The patch carried no fields; nothing was written.
    Noop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrder {
    Id,
    UpdatedDt,
    Active,
}

impl QuestionOrder {
    /// Unknown keys map to `None`, which lists unordered.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "id" => Some(QuestionOrder::Id),
            "updated_dt" => Some(QuestionOrder::UpdatedDt),
            "active" => Some(QuestionOrder::Active),
            _ => None,
        }
    }

    pub fn order_clause(self) -> &'static str {
        match self {
            QuestionOrder::Id => " ORDER BY id DESC",
            QuestionOrder::UpdatedDt => " ORDER BY updated_dt DESC",
            QuestionOrder::Active => " ORDER BY active DESC",
        }
    }
}

/// Which pending round is served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingOrder {
    /// Lowest round id first (insertion order).
    #[default]
    Oldest,
    Newest,
}

impl PendingOrder {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "oldest" => Some(PendingOrder::Oldest),
            "newest" => Some(PendingOrder::Newest),
            _ => None,
        }
    }

    pub fn direction(self) -> &'static str {
        match self {
            PendingOrder::Oldest => "ASC",
            PendingOrder::Newest => "DESC",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionFilter {
    pub active: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    /// Pins a single question; only honoured by the with-answers listing.
    #[serde(default)]
    pub question_id: Option<i64>,
}

fn default_limit() -> i64 {
    10
}

impl QuestionFilter {
    pub fn new(active: bool) -> Self {
        QuestionFilter {
            active,
            text: None,
            order: None,
            limit: default_limit(),
            offset: 0,
            question_id: None,
        }
    }

    /// Negative paging is rejected before it reaches SQL: SQLite reads
    /// `LIMIT -1` as "no limit" and Postgres refuses it.
    pub fn check_paging(&self) -> Result<(), String> {
        if self.limit < 0 {
            return Err(format!("limit must be >= 0, got {}", self.limit));
        }
        if self.offset < 0 {
            return Err(format!("offset must be >= 0, got {}", self.offset));
        }
        Ok(())
    }

    pub fn text_pattern(&self) -> Option<String> {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{t}%"))
    }

    pub fn order_by(&self) -> Option<QuestionOrder> {
        self.order.as_deref().and_then(QuestionOrder::from_key)
    }
}

/// Attaches answers to their questions, keeping question order and dropping
/// repeated question ids.
pub fn attach_answers(questions: Vec<Question>, answers: Vec<Answer>) -> Vec<QuestionWithAnswers> {
    let mut by_question: HashMap<i64, Vec<Answer>> = HashMap::new();
    for answer in answers {
        by_question.entry(answer.question_id).or_default().push(answer);
    }

    let mut seen = HashSet::new();
    questions
        .into_iter()
        .filter(|q| seen.insert(q.id))
        .map(|question| QuestionWithAnswers {
            answers: by_question.remove(&question.id).unwrap_or_default(),
            question,
        })
        .collect()
}
