mod handlers;
mod state;
mod static_files;

use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::{AirwatchError, Result};
use crate::location::AirQualityApi;
use crate::session::Session;

pub fn build_router<A: AirQualityApi + 'static>(session: Session<A>) -> Router {
    let state = Arc::new(AppState::new(session));

    Router::new()
        .route("/", get(handlers::index))
        .route("/api/countries", get(handlers::countries::<A>))
        .route("/api/states", get(handlers::states::<A>))
        .route("/api/cities", get(handlers::cities::<A>))
        .route("/api/conditions", get(handlers::conditions::<A>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start<A: AirQualityApi + 'static>(host: &str, port: u16, session: Session<A>) -> Result<()> {
    let app = build_router(session);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AirwatchError::Config(format!("cannot bind to {}: {}", addr, e)))?;

    info!(%addr, "server listening");
    eprintln!("  airwatch listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop.");

    axum::serve(listener, app).await?;
    Ok(())
}
