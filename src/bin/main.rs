use actix_web::{middleware::Logger, App, HttpServer};
use anyhow::Context;
use quiz_server::config::Config;
use quiz_server::http::{self, AppState};
use quiz_server::{db, logging, metrics};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Configuration
    let cfg = Config::from_env()?;
    logging::init(cfg.debug)?;

    // Storage
    let backend = db::connect(&cfg.database)
        .await
        .context("failed to open database pool")?;
    if cfg.database.migrate {
        backend.migrate().await.context("schema migration failed")?;
    }

    let prometheus = metrics::build()?;
    let state = AppState {
        backend,
        game: cfg.game.clone(),
        api_key: cfg.api_key.clone(),
    };
    if state.api_key.is_none() {
        log::warn!("KEY is not set; game, telegram and user routes are open");
    }

    log::info!("listening on {}", cfg.server_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(prometheus.clone())
            .configure(http::configure(state.clone()))
    })
    .bind(&cfg.server_addr)
    .with_context(|| format!("cannot bind {}", cfg.server_addr))?
    .run()
    .await?;
    Ok(())
}
