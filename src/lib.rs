//! Shopping List Server
//!
//! Layered architecture:
//! - domain: Core entities, validation and business rules
//! - repository: SQLite access, ordering engine, transactions
//! - notifier: Viewer registry and change broadcast
//! - handlers: REST API, web-view snapshot and WebSocket

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tracing::info;

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod notifier;
pub mod repository;

use config::Config;
use error::AppError;
use notifier::Notifier;
use repository::{
    init_db, BatchRepository, DbState, HistoryRepository, ItemRepository, ListRepository,
    SectionRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub lists: ListRepository,
    pub sections: SectionRepository,
    pub items: ItemRepository,
    pub history: HistoryRepository,
    pub batch: BatchRepository,
    pub notifier: Notifier,
    /// `None` disables `/api/v1`
    pub api_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(db_state: DbState, notifier: Notifier, api_token: Option<String>) -> Self {
        Self {
            lists: ListRepository::new(db_state.clone()),
            sections: SectionRepository::new(db_state.clone()),
            items: ItemRepository::new(db_state.clone()),
            history: HistoryRepository::new(db_state.clone()),
            batch: BatchRepository::new(db_state),
            notifier,
            api_token: api_token.filter(|t| !t.is_empty()).map(Arc::from),
        }
    }
}

/// Open the store, serve until a shutdown signal, then close the store
pub async fn run(config: Config) -> Result<(), AppError> {
    info!("Initializing database...");
    let db_state = init_db(&config.db_path, config.store_timeout).await?;

    let state = AppState::new(
        db_state.clone(),
        Notifier::new(config.viewer_buffer),
        config.api_token.clone(),
    );
    let app = handlers::router(state);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!(api_enabled = config.api_enabled(), "Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down...");
    db_state.close().await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
