//! HTTP surface: actix-web handlers over the service layer.

use actix_web::web;
use std::sync::Arc;

use crate::config::GameSettings;
use crate::db::Backend;

pub mod answers;
pub mod auth;
pub mod game;
pub mod health;
pub mod questions;
pub mod routes;
pub mod telegram;
pub mod users;

/// Everything the handlers pull out of `app_data`.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub game: GameSettings,
    pub api_key: Option<String>,
}

/// Registers app data and all routes. Used by `main` and by the tests.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::from(state.backend))
            .app_data(web::Data::new(state.game))
            .app_data(web::Data::new(auth::ApiKeyConfig(state.api_key)))
            .configure(routes::init_routes);
    }
}
