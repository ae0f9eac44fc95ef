//! User registry endpoints.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::db::Backend;
use crate::error::ApiError;
use crate::http::auth::ApiKey;
use crate::service::UsersManager;

#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// POST /v1/users
#[post("/users")]
pub async fn register(
    _key: ApiKey,
    info: web::Json<Credentials>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    if info.username.trim().is_empty() || info.password.is_empty() {
        return Err(ApiError::BadRequest("username and password are required".into()));
    }
    let mut session = db.begin().await?;
    let id = UsersManager::new(&mut *session)
        .register(info.username.trim(), &info.password)
        .await?;
    session.commit().await?;
    Ok(HttpResponse::Created().json(json!({ "created": id })))
}

/// POST /v1/users/verify
#[post("/users/verify")]
pub async fn verify(
    _key: ApiKey,
    info: web::Json<Credentials>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let valid = UsersManager::new(&mut *session)
        .verify(info.username.trim(), &info.password)
        .await?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(json!({ "valid": valid })))
}

/// GET /v1/users
#[get("/users")]
pub async fn list(_key: ApiKey, db: web::Data<dyn Backend>) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let users = UsersManager::new(&mut *session).list().await?;
    session.commit().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// DELETE /v1/users/{id}
#[delete("/users/{id}")]
pub async fn remove(
    _key: ApiKey,
    path: web::Path<i64>,
    db: web::Data<dyn Backend>,
) -> Result<HttpResponse, ApiError> {
    let mut session = db.begin().await?;
    let removed = UsersManager::new(&mut *session)
        .remove(path.into_inner())
        .await?;
    if removed == 0 {
        return Err(ApiError::NotFound);
    }
    session.commit().await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(verify)
        .service(list)
        .service(remove);
}
