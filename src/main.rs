use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use std::time::Duration;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod model;
mod routes;
mod scheduling;
mod store;

use config::Config;
use db::init_db;
use routes::Limiters;
use scheduling::{Scheduler, SystemClock};
use store::{MySqlEmployeeDirectory, MySqlStore};

use crate::docs::ApiDoc;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    let level: tracing::Level = config
        .log_level
        .parse()
        .with_context(|| format!("LOG_LEVEL has an invalid value: {:?}", config.log_level))?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "scheduling.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;

    let scheduler = Data::new(Scheduler::from_store(
        Arc::new(MySqlStore::new(pool.clone())),
        Arc::new(MySqlEmployeeDirectory::new(
            pool.clone(),
            Duration::from_secs(config.employee_cache_ttl),
        )),
        Arc::new(SystemClock),
    ));
    let limiters = Limiters::from_config(&config)?;

    let server_addr = config.server_addr.clone();
    let config_data = Data::new(config);

    info!(addr = %server_addr, "Listening");

    HttpServer::new(move || {
        let api_prefix = config_data.api_prefix.clone();
        let limiters = limiters.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(config_data.clone())
            .app_data(scheduler.clone())
            .service(api::health::health)
            // auth + protected routes with rate limiting
            .configure(|cfg| routes::configure(cfg, &api_prefix, limiters))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await
    .context("Server error")
}
