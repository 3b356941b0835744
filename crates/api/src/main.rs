use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pages_api::config::ServerConfig;
use pages_api::router::build_app_router;
use pages_api::state::AppState;
use pages_core::i18n::Translator;
use pages_core::status::Statuses;
use pages_core::store::{MemoryPageStore, PageStore};
use pages_db::PgPageStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pages_api=debug,pages_db=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        vault_prefix = %config.vault_prefix,
        "Loaded server configuration"
    );

    let statuses = match &config.page_statuses {
        Some(list) => Statuses::parse(list).expect("PAGE_STATUSES must be value:Label pairs"),
        None => Statuses::default(),
    };

    let translator = match &config.locale_catalog {
        Some(path) => {
            let translator =
                Translator::from_file(path).expect("Failed to load LOCALE_CATALOG");
            tracing::info!(path = %path.display(), "Locale catalog loaded");
            translator
        }
        None => Translator::default(),
    };

    // --- Page store ---
    let store: Arc<dyn PageStore> = match &config.database_url {
        Some(database_url) => {
            let pool = pages_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            pages_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            pages_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgPageStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, pages are kept in memory and lost on exit");
            Arc::new(MemoryPageStore::new())
        }
    };

    // --- App state and router ---
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_secs);
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(store, config.clone(), statuses, translator);
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    // In-flight requests get `shutdown_timeout` once the signal arrives.
    tokio::select! {
        result = server.into_future() => result.expect("Server error"),
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => {
            tracing::warn!(?shutdown_timeout, "Graceful shutdown timed out, forcing exit");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
