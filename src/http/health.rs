//! Simple liveness / readiness probe

use actix_web::{get, web, HttpResponse, Responder};

use crate::db::Backend;

#[get("/healthz")]
pub async fn healthz(db: web::Data<dyn Backend>) -> impl Responder {
    if let Err(e) = db.ping().await {
        log::warn!("health check failed: {e}");
        return HttpResponse::ServiceUnavailable().body("db");
    }
    HttpResponse::Ok().body("ok")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
