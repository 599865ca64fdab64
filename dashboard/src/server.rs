use crate::errors::{Error, Result};
use crate::metrics;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use tracing::{error, info};

pub fn create_router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serves the metrics endpoint until the listener fails.
pub async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Metrics listening on {}", addr);
    axum::serve(listener, create_router()).await?;
    Ok(())
}

async fn metrics_handler() -> std::result::Result<String, AppError> {
    Ok(metrics::gather_metrics()?)
}

struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Metrics error: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal server error: {}", self.0),
        )
            .into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}
