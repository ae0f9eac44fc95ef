//! Question CRUD and the quiz listing.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::models::{Edit, NewQuestion, QuestionFilter, QuestionPatch};
use crate::db::Backend;
use crate::error::ApiError;
use crate::service::{AnswersManager, QuestionsManager};

#[derive(Deserialize)]
pub struct SubmitAnswerParams {
    pub question_id: i64,
    pub answer_id: i64,
}

/// GET /v1/quiz
#[get("/quiz")]
pub async fn show_quiz(
    filter: web::Query<QuestionFilter>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    filter.check_paging().map_err(ApiError::BadRequest)?;
    let mut session = db.begin().await?;
    let questions = QuestionsManager::new(&mut *session)
        .list_questions_with_answers(&filter)
        .await?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(questions))
}

/// GET /v1/questions
#[get("/questions")]
pub async fn list_questions(
    filter: web::Query<QuestionFilter>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    filter.check_paging().map_err(ApiError::BadRequest)?;
    let mut session = db.begin().await?;
    let questions = QuestionsManager::new(&mut *session)
        .list_questions(&filter)
        .await?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(questions))
}

/// POST /v1/question
#[post("/question")]
pub async fn add_question(
    info: web::Json<NewQuestion>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let Some(id) = QuestionsManager::new(&mut *session).add_question(&info).await else {
        return Err(ApiError::BadRequest("question not created".into()));
    };
    session.commit().await?;
    Ok(HttpResponse::Created().json(json!({ "created": id })))
}

/// GET /v1/question/{id}
#[get("/question/{id}")]
pub async fn get_question(
    path: web::Path<i64>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let question = QuestionsManager::new(&mut *session)
        .get_question(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(question))
}

/// GET /v1/question/{id}/answers
#[get("/question/{id}/answers")]
pub async fn question_answers(
    path: web::Path<i64>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let answers = AnswersManager::new(&mut *session)
        .answers_for_question(path.into_inner())
        .await?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(answers))
}

/// PATCH /v1/question/{id}: changes only the provided fields.
#[patch("/question/{id}")]
pub async fn edit_question(
    path: web::Path<i64>,
    info: web::Json<QuestionPatch>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let edited = match QuestionsManager::new(&mut *session)
        .edit_question(path.into_inner(), &info)
        .await?
    {
        Edit::Edited(question) => Some(question),
        Edit::Noop => None,
        Edit::NotFound => return Err(ApiError::NotFound),
    };
    session.commit().await?;
    Ok(HttpResponse::Ok().json(json!({ "edited": edited })))
}

/// DELETE /v1/question/{id}
#[delete("/question/{id}")]
pub async fn delete_question(
    path: web::Path<i64>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let removed = QuestionsManager::new(&mut *session)
        .remove_question(path.into_inner())
        .await?;
    if removed == 0 {
        return Err(ApiError::NotFound);
    }
    session.commit().await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /v1/submit-answer?question_id=..&answer_id=..
#[post("/submit-answer")]
pub async fn submit_answer(
    params: web::Query<SubmitAnswerParams>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let is_correct = QuestionsManager::new(&mut *session)
        .compare_submitted_answer(params.question_id, params.answer_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(json!({ "is_correct": is_correct })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(show_quiz)
        .service(list_questions)
        .service(add_question)
        .service(question_answers)
        .service(get_question)
        .service(edit_question)
        .service(delete_question)
        .service(submit_answer);
}
