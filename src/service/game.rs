//! Round flow for one player: start a batch, serve pending questions, score
//! submissions.

use serde::Serialize;

use crate::config::GameSettings;
use crate::db::models::QuestionWithAnswers;
use crate::db::repo::{AnswerRepo, GameRepo, QuestionRepo};
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStart {
    pub player_id: Option<i64>,
    pub rounds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub is_correct: bool,
    /// Score after this submission.
    pub score: Option<i64>,
}

pub struct GameManager<'a, R: ?Sized> {
    repo: &'a mut R,
    settings: &'a GameSettings,
}

impl<'a, R> GameManager<'a, R>
where
    R: GameRepo + QuestionRepo + AnswerRepo + ?Sized,
{
    pub fn new(repo: &'a mut R, settings: &'a GameSettings) -> Self {
        GameManager { repo, settings }
    }

    /// Registers the player if needed, clears answered rounds and hands out a
    /// fresh batch (`amount` defaults to the configured round size).
    pub async fn start(&mut self, tg_id: i64, amount: Option<i64>) -> Result<GameStart, StoreError> {
        let amount = amount.unwrap_or(self.settings.round_size);
        let player_id = self.repo.ensure_player(tg_id).await?.map(|p| p.id);
        let purged = self.repo.delete_answered_rounds(tg_id).await?;
        let rounds = self.repo.create_round_batch(tg_id, amount).await?;
        log::info!("player {tg_id}: {rounds} new rounds, {purged} old rounds removed");
        Ok(GameStart { player_id, rounds })
    }

    pub async fn next_question(&mut self, tg_id: i64) -> Result<Option<QuestionWithAnswers>, StoreError> {
        let Some(question_id) = self
            .repo
            .next_pending_question(tg_id, self.settings.pending_order)
            .await?
        else {
            return Ok(None);
        };
        self.repo.question_by_id(question_id).await
    }

    /// `None` when the question does not exist. A pending round is consumed
    /// either way; the score only moves on a correct answer to a round that
    /// was still pending.
    pub async fn submit(
        &mut self,
        tg_id: i64,
        question_id: i64,
        answer_id: i64,
    ) -> Result<Option<SubmitOutcome>, StoreError> {
        if !self.repo.question_exists(question_id).await? {
            return Ok(None);
        }
        let correct = self.repo.correct_answers_for_question(question_id).await?;
        let is_correct = correct.iter().any(|a| a.id == answer_id);

        let consumed = self.repo.mark_answered(question_id, tg_id).await?;
        if consumed == 0 {
            log::warn!("player {tg_id}: no pending round for question {question_id}");
        }
        let score = if is_correct && consumed > 0 {
            self.repo.increment_score(tg_id).await?
        } else {
            self.repo.score_of(tg_id).await?
        };
        Ok(Some(SubmitOutcome { is_correct, score }))
    }

    pub async fn score(&mut self, tg_id: i64) -> Result<Option<i64>, StoreError> {
        self.repo.score_of(tg_id).await
    }
}
