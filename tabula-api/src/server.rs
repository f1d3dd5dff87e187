//! API Server setup

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tabula_db::SheetDatabase;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::routes::create_router;
use crate::state::{ApiConfig, AppState};

/// Create the API server
pub fn create_server(
    config: &ApiConfig,
    database: Arc<SheetDatabase>,
) -> Result<(Router, SocketAddr), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState::new(database)?;

    let mut router = create_router(state).layer(TraceLayer::new_for_http());

    if config.enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    Ok((router, addr))
}

/// Open the configured database and serve until the process is stopped
pub async fn run_server(config: ApiConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let database = Arc::new(SheetDatabase::open(&config.database_path)?);
    let (router, addr) = create_server(&config, database)?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        database = %config.database_path,
        "Tabula API server listening"
    );
    axum::serve(listener, router).await?;

    Ok(())
}
