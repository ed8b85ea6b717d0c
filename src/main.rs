// src/main.rs
use actix_web::{
    middleware::{Compress, DefaultHeaders, Logger, NormalizePath},
    web, App, HttpServer,
};
use actix_web::http::header;
use actix_cors::Cors;
use anyhow::Context;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod handlers;
mod inventory_handlers;
mod models;
mod monitoring;
mod projection;
mod repositories;
mod routes;
mod user_handlers;
mod validation;
#[cfg(test)]
mod test_support;

use crate::config::{load_config, Config, SecurityConfig};
use crate::monitoring::{Metrics, RequestLogger};

pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    setup_logging(&config)?;
    config.print_startup_info();

    let pool = db::create_database_pool(&config.database).await?;
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let app_state = Arc::new(AppState {
        db_pool: pool,
        config: config.clone(),
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Starting server at http://{}", bind_address);

    let metrics_arc = Arc::new(Metrics::new());
    let metrics = web::Data::from(metrics_arc.clone());
    let server_config = config.server.clone();

    let server = HttpServer::new(move || {
        let cors = setup_cors(&app_state.config);
        let security_headers = setup_security_headers(&app_state.config.security);

        App::new()
            .wrap(cors)
            .wrap(security_headers)
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(RequestLogger::new(metrics_arc.clone()))
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(app_state.clone()))
            .app_data(metrics.clone())
            .app_data(error::json_config(app_state.config.security.max_request_size))
            .service(
                web::scope("/health")
                    .route("", web::get().to(monitoring::health_check))
                    .route("/metrics", web::get().to(monitoring::metrics_endpoint))
                    .route("/ready", web::get().to(monitoring::readiness_check)),
            )
            .configure(routes::configure)
    })
    .keep_alive(std::time::Duration::from_secs(server_config.keep_alive))
    .client_request_timeout(std::time::Duration::from_secs(server_config.client_timeout))
    .client_disconnect_timeout(std::time::Duration::from_secs(server_config.client_shutdown));

    let server = match server_config.workers {
        Some(workers) => server.workers(workers),
        None => server,
    };

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server failed to run")?;

    Ok(())
}

// ==================== HELPER FUNCTIONS ====================

pub fn setup_cors(config: &Config) -> Cors {
    let allowed_origins = &config.security.allowed_origins;

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .max_age(3600);

    // Wildcards are rejected for production by `Config::validate`.
    if allowed_origins.iter().any(|o| o == "*") && !config.is_production() {
        log::warn!("⚠️  Using wildcard CORS (*) in development mode");
        return cors.allow_any_origin();
    }

    for origin in allowed_origins.iter().filter(|o| !o.is_empty()) {
        cors = cors.allowed_origin(origin);
    }
    cors
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(())
}

fn setup_security_headers(config: &SecurityConfig) -> DefaultHeaders {
    let mut headers = DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"));

    if config.require_https {
        headers = headers.add((
            "Strict-Transport-Security",
            "max-age=31536000; includeSubDomains",
        ));
    }

    headers
}
