//! HTTP and WebSocket transport.
//!
//! Maps REST requests onto [`ListService`] calls and WebSocket connections
//! onto subscriptions. Holds no list state of its own.

mod handlers;
mod router;
mod socket;

pub use handlers::ApiError;
pub use router::build_router;

use crate::config::ServerConfig;
use crate::service::ListService;
use crate::subscriptions::SubscriptionConfig;
use axum::extract::FromRef;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: ListService,
    /// Config for each new WebSocket subscriber.
    pub subscription: SubscriptionConfig,
}

impl AppState {
    pub fn new(service: ListService, config: &ServerConfig) -> Self {
        Self {
            service,
            subscription: SubscriptionConfig {
                buffer_size: config.subscriber_buffer,
            },
        }
    }
}

impl FromRef<AppState> for ListService {
    fn from_ref(state: &AppState) -> Self {
        state.service.clone()
    }
}

/// Bind the configured address and serve until SIGINT/SIGTERM.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind).await?;
    let state = AppState::new(ListService::new(), &config);
    run(listener, state).await
}

/// Serve on an already bound listener until SIGINT/SIGTERM.
pub async fn run(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "shopping list server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Wait for shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(err) => error!("failed to install Ctrl+C handler: {}", err),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => error!("failed to install SIGTERM handler: {}", err),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received SIGINT, shutting down");
        }
        _ = terminate => {
            info!("received SIGTERM, shutting down");
        }
    }
}
