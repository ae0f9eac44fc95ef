//! Per-player rounds and scores, keyed by Telegram id.

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::config::GameSettings;
use crate::db::Backend;
use crate::error::ApiError;
use crate::http::auth::ApiKey;
use crate::service::GameManager;

#[derive(Deserialize)]
pub struct StartParams {
    pub amount: Option<i64>,
}

#[derive(Deserialize)]
pub struct AnswerReq {
    pub question_id: i64,
    pub answer_id: i64,
}

/// POST /v1/game/{tg_id}/start
#[post("/game/{tg_id}/start")]
pub async fn start(
    _key: ApiKey,
    path: web::Path<i64>,
    params: web::Query<StartParams>,
    db: web::Data<dyn Backend>,
    settings: web::Data<GameSettings>,
) -> Result<HttpResponse, ApiError> {
    if matches!(params.amount, Some(n) if n <= 0) {
        return Err(ApiError::BadRequest("amount must be > 0".into()));
    }
    let mut session = db.begin().await?;
    let started = GameManager::new(&mut *session, &settings)
        .start(path.into_inner(), params.amount)
        .await?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(started))
}

/// GET /v1/game/{tg_id}/next
#[get("/game/{tg_id}/next")]
pub async fn next_question(
    _key: ApiKey,
    path: web::Path<i64>,
    db: web::Data<dyn Backend>,
    settings: web::Data<GameSettings>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let question = GameManager::new(&mut *session, &settings)
        .next_question(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(question))
}

/// POST /v1/game/{tg_id}/answer
#[post("/game/{tg_id}/answer")]
pub async fn answer(
    _key: ApiKey,
    path: web::Path<i64>,
    info: web::Json<AnswerReq>,
    db: web::Data<dyn Backend>,
    settings: web::Data<GameSettings>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let outcome = GameManager::new(&mut *session, &settings)
        .submit(path.into_inner(), info.question_id, info.answer_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// GET /v1/game/{tg_id}/score
#[get("/game/{tg_id}/score")]
pub async fn score(
    _key: ApiKey,
    path: web::Path<i64>,
    db: web::Data<dyn Backend>,
    settings: web::Data<GameSettings>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let score = GameManager::new(&mut *session, &settings)
        .score(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(json!({ "score": score })))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(start)
        .service(next_question)
        .service(answer)
        .service(score);
}
