//! API server setup

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use loyalty_config::LoyaltyConfig;
use loyalty_token::TokenError;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::create_router;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to initialize token service: {0}")]
    Token(#[from] TokenError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Router with tracing and, when enabled, a permissive CORS layer
pub fn create_app(config: &LoyaltyConfig, state: AppState) -> Router {
    let mut router = create_router(state).layer(TraceLayer::new_for_http());

    if config.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

async fn bind(config: &LoyaltyConfig) -> Result<TcpListener, ServerError> {
    Ok(TcpListener::bind(config.bind_address()).await?)
}

/// Run the API server until `shutdown` resolves
pub async fn run_server<F>(config: LoyaltyConfig, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(&config)?;
    let router = create_app(&config, state);

    let listener = bind(&config).await?;
    tracing::info!("Loyalty API listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Loyalty API stopped");
    Ok(())
}

/// Start server in background (for testing)
pub async fn start_background_server(
    config: &LoyaltyConfig,
    state: AppState,
) -> Result<SocketAddr, ServerError> {
    let router = create_app(config, state);

    // Bind to get actual address (useful when port is 0)
    let listener = bind(config).await?;
    let actual_addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
