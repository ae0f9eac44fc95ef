use actix_web::{delete, get, post, web, HttpResponse};
use serde_json::json;

use crate::db::models::NewAnswer;
use crate::db::Backend;
use crate::error::ApiError;
use crate::service::AnswersManager;

/// POST /v1/answer
#[post("/answer")]
pub async fn add_answer(
    info: web::Json<NewAnswer>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let id = AnswersManager::new(&mut *session).add_answer(&info).await?;
    session.commit().await?;
    Ok(HttpResponse::Created().json(json!({ "created": id })))
}

/// GET /v1/answer/{id}; `null` when absent.
#[get("/answer/{id}")]
pub async fn get_answer(
    path: web::Path<i64>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let answer = AnswersManager::new(&mut *session)
        .get_answer(path.into_inner())
        .await?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(answer))
}

/// DELETE /v1/answer/{id}
#[delete("/answer/{id}")]
pub async fn delete_answer(
    path: web::Path<i64>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let removed = AnswersManager::new(&mut *session)
        .remove_answer(path.into_inner())
        .await?;
    if removed == 0 {
        return Err(ApiError::NotFound);
    }
    session.commit().await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(add_answer)
        .service(get_answer)
        .service(delete_answer);
}
