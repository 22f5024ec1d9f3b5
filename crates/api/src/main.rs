use std::future::IntoFuture;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use taskboard_api::config::{AssistantConfig, ServerConfig, StoreBackend};
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;
use taskboard_board::assistant::{AnswerProvider, Assistant, GeminiProvider, RuleBasedProvider};
use taskboard_db::store::{MemoryStore, PgStore, Store};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_api=debug,taskboard_board=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store = open_store(&config.store).await?;
    tracing::info!(backend = store.backend_name(), "Store ready");

    // --- Assistant ---
    let assistant = match &config.assistant {
        AssistantConfig::Rules => Assistant::Rules(RuleBasedProvider),
        AssistantConfig::Gemini(gemini) => Assistant::Gemini(
            GeminiProvider::new(gemini.clone()).context("Failed to build Gemini client")?,
        ),
    };
    tracing::info!(provider = assistant.name(), "Assistant provider selected");

    // --- Router ---
    let state = AppState::new(store, assistant, config.clone());
    let app = build_app_router(state, &config)?;

    // --- Start server ---
    let ip: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    // In-flight requests get `shutdown_timeout_secs` to finish once a signal arrives.
    tokio::select! {
        result = server => result.context("Server error")?,
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            tracing::warn!(timeout_secs = config.shutdown_timeout_secs, "Drain timeout elapsed, exiting");
        }
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

async fn open_store(backend: &StoreBackend) -> anyhow::Result<Store> {
    match backend {
        StoreBackend::Postgres { database_url } => {
            let pool = taskboard_db::create_pool(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            taskboard_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            taskboard_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(PgStore::new(pool).into())
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(MemoryStore::new().into())
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
