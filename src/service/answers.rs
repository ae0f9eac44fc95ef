use crate::db::models::{Answer, NewAnswer};
use crate::db::repo::AnswerRepo;
use crate::error::{QuizError, StoreError};

pub struct AnswersManager<'a, R: ?Sized> {
    repo: &'a mut R,
}

impl<'a, R> AnswersManager<'a, R>
where
    R: AnswerRepo + ?Sized,
{
    pub fn new(repo: &'a mut R) -> Self {
        AnswersManager { repo }
    }

    /// Constraint violations (unknown question, ...) come back as
    /// [`QuizError::AnswerNotAdded`] carrying the storage detail.
    pub async fn add_answer(&mut self, answer: &NewAnswer) -> Result<i64, QuizError> {
        match self.repo.add_answer(answer).await {
            Ok(id) => Ok(id),
            Err(StoreError::Constraint { detail }) => {
                let err = QuizError::AnswerNotAdded { detail };
                log::error!("{err}");
                Err(err)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn remove_answer(&mut self, id: i64) -> Result<u64, StoreError> {
        self.repo.remove_answer(id).await
    }

    pub async fn get_answer(&mut self, id: i64) -> Result<Option<Answer>, StoreError> {
        self.repo.answer_by_id(id).await
    }

    pub async fn answers_for_question(&mut self, question_id: i64) -> Result<Vec<Answer>, StoreError> {
        self.repo.answers_for_question(question_id).await
    }
}
