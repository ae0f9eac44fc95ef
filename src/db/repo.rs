//! Repository traits. Each backend's session implements all of them.
//!
//! Method names carry the table they touch so the traits can share one
//! receiver without clashing.

use async_trait::async_trait;

use super::models::{
    Answer, Edit, NewAnswer, NewQuestion, PendingOrder, Player, Question, QuestionFilter,
    QuestionPatch, QuestionWithAnswers, User, UserSummary,
};
use crate::error::StoreError;

#[async_trait]
pub trait QuestionRepo: Send {
    /// Never fails: storage errors are logged, rolled back and reported as
    /// `None`.
    async fn add_question(&mut self, question: &NewQuestion) -> Option<i64>;

    /// Answers and rounds of the question go with it.
    async fn remove_question(&mut self, id: i64) -> Result<u64, StoreError>;

    async fn edit_question(
        &mut self,
        id: i64,
        patch: &QuestionPatch,
    ) -> Result<Edit<Question>, StoreError>;

    async fn question_by_id(&mut self, id: i64) -> Result<Option<QuestionWithAnswers>, StoreError>;

    async fn question_exists(&mut self, id: i64) -> Result<bool, StoreError>;

    async fn list_questions(&mut self, filter: &QuestionFilter) -> Result<Vec<Question>, StoreError>;

    async fn list_questions_with_answers(
        &mut self,
        filter: &QuestionFilter,
    ) -> Result<Vec<QuestionWithAnswers>, StoreError>;
}

#[async_trait]
pub trait AnswerRepo: Send {
    /// Failed inserts are rolled back and logged before the error is returned.
    async fn add_answer(&mut self, answer: &NewAnswer) -> Result<i64, StoreError>;

    async fn remove_answer(&mut self, id: i64) -> Result<u64, StoreError>;

    async fn answer_by_id(&mut self, id: i64) -> Result<Option<Answer>, StoreError>;

    async fn answers_for_question(&mut self, question_id: i64) -> Result<Vec<Answer>, StoreError>;

    async fn correct_answers_for_question(
        &mut self,
        question_id: i64,
    ) -> Result<Vec<Answer>, StoreError>;
}

#[async_trait]
pub trait GameRepo: Send {
    /// Assigns up to `amount` random active questions the player has not got
    /// pending. Returns how many rounds were created.
    async fn create_round_batch(&mut self, tg_id: i64, amount: i64) -> Result<u64, StoreError>;

    async fn delete_answered_rounds(&mut self, tg_id: i64) -> Result<u64, StoreError>;

    async fn next_pending_question(
        &mut self,
        tg_id: i64,
        order: PendingOrder,
    ) -> Result<Option<i64>, StoreError>;

    /// Marks the player's pending rounds for the question as asked. Zero when
    /// nothing was pending.
    async fn mark_answered(&mut self, question_id: i64, tg_id: i64) -> Result<u64, StoreError>;

    /// Idempotent; returns the player's row.
    async fn ensure_player(&mut self, tg_id: i64) -> Result<Option<Player>, StoreError>;

    /// Atomic `score + 1`; `None` when the player does not exist.
    async fn increment_score(&mut self, tg_id: i64) -> Result<Option<i64>, StoreError>;

    async fn score_of(&mut self, tg_id: i64) -> Result<Option<i64>, StoreError>;
}

#[async_trait]
pub trait TelegramCursorRepo: Send {
    async fn last_update_id(&mut self) -> Result<Option<i64>, StoreError>;

    async fn set_last_update_id(&mut self, id: i64) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserRepo: Send {
    /// `None` when the username is taken.
    async fn put_user(&mut self, username: &str, password_hash: &str)
        -> Result<Option<i64>, StoreError>;

    async fn user_by_username(&mut self, username: &str) -> Result<Option<User>, StoreError>;

    async fn list_users(&mut self) -> Result<Vec<UserSummary>, StoreError>;

    async fn remove_user(&mut self, id: i64) -> Result<u64, StoreError>;
}
