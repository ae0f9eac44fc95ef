use crate::http;
use actix_web::web;

/// Mount every HTTP sub-module under `/v1`; the health probe stays at the root.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(http::health::init_routes).service(
        web::scope("/v1")
            .configure(http::questions::init_routes)
            .configure(http::answers::init_routes)
            .configure(http::game::init_routes)
            .configure(http::telegram::init_routes)
            .configure(http::users::init_routes),
    );
}
