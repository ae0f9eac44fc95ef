//! Last processed Telegram update id, so a polling bot can resume.

use actix_web::{get, put, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::{Backend, TelegramCursorRepo};
use crate::error::ApiError;
use crate::http::auth::ApiKey;

#[derive(Deserialize)]
pub struct UpdateReq {
    pub update_id: i64,
}

/// GET /v1/tg/update
#[get("/tg/update")]
pub async fn last_update(
    _key: ApiKey,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let id = session.last_update_id().await?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(json!({ "last_update_id": id })))
}

/// PUT /v1/tg/update
#[put("/tg/update")]
pub async fn set_update(
    _key: ApiKey,
    info: web::Json<UpdateReq>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    session.set_last_update_id(info.update_id).await?;
    session.commit().await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(last_update).service(set_update);
}
