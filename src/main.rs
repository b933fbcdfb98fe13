use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use envconfig::Envconfig;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::auth::RoleTokens;
use crate::rate_limit::RateLimiter;
use crate::services::Mailer;
use crate::state::AppState;

mod auth;
mod db;
mod error;
mod handlers;
mod rate_limit;
mod report;
mod services;
mod state;

type Error = Box<dyn std::error::Error + Send + Sync>;

/// Inbound requests allowed per client address per minute.
const REQUEST_LIMIT: u32 = 100;

#[derive(Envconfig)]
pub struct Config {
    #[envconfig(from = "DATABASE_URL")]
    database_url: String,

    #[envconfig(from = "SERVER_PORT", default = "8080")]
    server_port: u16,

    #[envconfig(from = "CUSTOMER_TOKEN")]
    customer_token: String,

    #[envconfig(from = "ADMIN_TOKEN")]
    admin_token: String,

    #[envconfig(from = "SMTP_SERVER")]
    smtp_server: String,

    #[envconfig(from = "SMTP_PORT", default = "587")]
    smtp_port: u16,

    #[envconfig(from = "SMTP_USERNAME")]
    smtp_username: String,

    #[envconfig(from = "SMTP_PASSWORD")]
    smtp_password: String,

    #[envconfig(from = "ORDER_REPORT_PATH", default = "order_report.csv")]
    report_path: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting the order service...");

    // Load environment variables from a .env file if present
    dotenv().ok();

    let config = Config::init_from_env()?;

    let pool = db::init_db(&config.database_url).await?;
    db::ensure_schema(&pool).await?;

    let mailer = Mailer::new(
        &config.smtp_server,
        config.smtp_port,
        config.smtp_username,
        config.smtp_password,
    )?;

    // One reminder sweep per day; the worker re-checks hourly once the
    // permit is spent.
    let task_limiter = RateLimiter::new(1, Duration::from_secs(24 * 60 * 60));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let reminder_task = tokio::spawn(services::run_reminder_loop(
        pool.clone(),
        mailer,
        task_limiter,
        shutdown_rx,
    ));

    let state = AppState {
        pool,
        tokens: RoleTokens {
            customer: config.customer_token,
            admin: config.admin_token,
        },
        request_limiter: Arc::new(RateLimiter::new(REQUEST_LIMIT, Duration::from_secs(60))),
        report_path: PathBuf::from(config.report_path),
    };

    let app = handlers::router(state);
    let listener = TcpListener::bind(("0.0.0.0", config.server_port)).await?;
    log::info!("Listening on port {}", config.server_port);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    // Stop the reminder worker and wait for it before exiting.
    let _ = shutdown_tx.send(true);
    let _ = reminder_task.await;

    log::info!("Shutting down gracefully");
    Ok(())
}
