//! HTTP surface of the chat proxy.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::application::ChatProxyUseCase;
use crate::domain::{ChatReply, ChatRequest, DomainError, ErrorBody};

type ProxyState = Arc<ChatProxyUseCase>;

/// `POST /api/chat` and `GET /health`, open to any origin.
pub fn router(use_case: Arc<ChatProxyUseCase>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(use_case)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(use_case: Arc<ChatProxyUseCase>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(
        "Chat proxy listening on http://{} (provider: {})",
        listener.local_addr()?,
        use_case.provider_name()
    );

    axum::serve(listener, router(use_case))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down chat proxy");
}

async fn chat(
    State(use_case): State<ProxyState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload.map_err(|e| DomainError::invalid_input(e.body_text()))?;
    let reply = use_case.execute(request).await?;
    Ok(Json(reply))
}

async fn health(State(use_case): State<ProxyState>) -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "provider": use_case.provider_name() }))
}

/// Renders a [`DomainError`] as `{"error": "..."}` with its status code.
struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::new(self.0.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: DomainError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn errors_render_with_status_and_message() {
        let (status, body) = render(DomainError::MissingCredential).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "API key is required");

        let (status, body) = render(DomainError::InvalidCredential).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid API key. Please check your key and try again.");

        let (status, _) = render(DomainError::RateLimited).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

        let (status, body) = render(DomainError::unknown("Overloaded")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Overloaded");
    }
}
