//! Service entry point: config, database, routers, background sweep.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tumaini_ussd::adapters::http::{
    dashboard_routes, ussd_routes, DashboardHandlers, UssdHandlers,
};
use tumaini_ussd::adapters::postgres::{
    PostgresBeneficiaryGateway, PostgresContactGateway, PostgresGoalGateway,
    PostgresIdentityGateway, PostgresSessionReader, PostgresSessionRepository,
    PostgresTrackingGateway,
};
use tumaini_ussd::application::handlers::dashboard::{
    ExportSessionsHandler, GetSessionHandler, ListSessionsHandler, SessionStatsHandler,
};
use tumaini_ussd::application::handlers::ussd::{
    ExpireStaleSessionsHandler, ProcessUssdTurnHandler,
};
use tumaini_ussd::config::AppConfig;
use tumaini_ussd::domain::foundation::Timestamp;
use tumaini_ussd::ports::{SessionReader, SessionRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,sqlx=warn".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Ports
    let sessions: Arc<dyn SessionRepository> =
        Arc::new(PostgresSessionRepository::new(pool.clone()));
    let session_reader: Arc<dyn SessionReader> =
        Arc::new(PostgresSessionReader::new(pool.clone()));
    let identities = Arc::new(PostgresIdentityGateway::new(pool.clone()));
    let beneficiaries = Arc::new(PostgresBeneficiaryGateway::new(pool.clone()));
    let goals = Arc::new(PostgresGoalGateway::new(pool.clone()));
    let contacts = Arc::new(PostgresContactGateway::new(pool.clone()));
    let tracking = Arc::new(PostgresTrackingGateway::new(pool));

    // Application handlers
    let process_handler = Arc::new(ProcessUssdTurnHandler::new(
        sessions.clone(),
        identities,
        beneficiaries,
        goals,
        contacts,
        tracking,
        config.ussd.session_timeout_secs,
    ));
    let dashboard_handlers = DashboardHandlers::new(
        Arc::new(ListSessionsHandler::new(session_reader.clone())),
        Arc::new(GetSessionHandler::new(session_reader.clone())),
        Arc::new(SessionStatsHandler::new(session_reader.clone())),
        Arc::new(ExportSessionsHandler::new(session_reader)),
    );

    // Background sweep for reporting hygiene
    let sweeper = ExpireStaleSessionsHandler::new(sessions);
    let sweep_interval = Duration::from_secs(config.ussd.sweep_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_interval);
        loop {
            ticker.tick().await;
            if let Err(err) = sweeper.handle(Timestamp::now()).await {
                tracing::warn!(error = %err, "stale session sweep failed");
            }
        }
    });

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/ussd", ussd_routes(UssdHandlers::new(process_handler)))
        .nest("/api/admin/sessions", dashboard_routes(dashboard_handlers))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr();
    tracing::info!(%addr, service_code = %config.ussd.service_code, "starting server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
