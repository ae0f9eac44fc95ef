use crate::db::models::{
    Edit, NewQuestion, Question, QuestionFilter, QuestionPatch, QuestionWithAnswers,
};
use crate::db::repo::{AnswerRepo, QuestionRepo};
use crate::error::StoreError;

pub struct QuestionsManager<'a, R: ?Sized> {
    repo: &'a mut R,
}

impl<'a, R> QuestionsManager<'a, R>
where
    R: QuestionRepo + AnswerRepo + ?Sized,
{
    pub fn new(repo: &'a mut R) -> Self {
        QuestionsManager { repo }
    }

    pub async fn add_question(&mut self, question: &NewQuestion) -> Option<i64> {
        self.repo.add_question(question).await
    }

    pub async fn edit_question(
        &mut self,
        id: i64,
        patch: &QuestionPatch,
    ) -> Result<Edit<Question>, StoreError> {
        self.repo.edit_question(id, patch).await
    }

    pub async fn remove_question(&mut self, id: i64) -> Result<u64, StoreError> {
        self.repo.remove_question(id).await
    }

    pub async fn get_question(&mut self, id: i64) -> Result<Option<QuestionWithAnswers>, StoreError> {
        self.repo.question_by_id(id).await
    }

    pub async fn list_questions(&mut self, filter: &QuestionFilter) -> Result<Vec<Question>, StoreError> {
        self.repo.list_questions(filter).await
    }

    pub async fn list_questions_with_answers(
        &mut self,
        filter: &QuestionFilter,
    ) -> Result<Vec<QuestionWithAnswers>, StoreError> {
        self.repo.list_questions_with_answers(filter).await
    }

    /// `Some(true)` when `answer_id` is one of the question's correct answers,
    /// `None` when the question does not exist.
    pub async fn compare_submitted_answer(
        &mut self,
        question_id: i64,
        answer_id: i64,
    ) -> Result<Option<bool>, StoreError> {
        if !self.repo.question_exists(question_id).await? {
            return Ok(None);
        }
        let correct = self.repo.correct_answers_for_question(question_id).await?;
        Ok(Some(correct.iter().any(|a| a.id == answer_id)))
    }
}
