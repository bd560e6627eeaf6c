//! HTTP API for survey submissions.
//!
//! `POST /api/survey` validates the required fields and inserts one row into
//! the configured store. Health and status endpoints and a Swagger UI sit
//! alongside it. Runs standalone (`signup serve`) or in-process next to the
//! terminal wizard (`signup wizard --serve`).

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use openapi::{ApiDoc, DocFormat};
pub use server::{RestApiServer, RestApiStatus};
pub use state::ApiState;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Survey endpoint
        .route("/api/survey", post(routes::survey::create))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

/// Bind `addr` and serve until the process exits
pub async fn serve(state: ApiState, addr: &str) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local: SocketAddr = listener.local_addr()?;

    tracing::info!("Survey API listening on http://{}", local);

    axum::serve(listener, app).await?;
    Ok(())
}
