//! Health endpoint for uptime monitors and hosting platforms, and the HTTP server it runs on.
//! In webhook mode the Telegram webhook route is merged into the same router.

use std::future::Future;

use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::info;

/// Static acknowledgment returned by every health route.
pub const HEALTH_BODY: &str = "Gemini Telegram bot is running";

/// `GET /` and `GET /health` → 200 with [`HEALTH_BODY`].
pub fn health_router() -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    HEALTH_BODY
}

/// Serves `router` on `listener` until `shutdown` resolves.
pub async fn serve_http<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(addr = %addr, "HTTP server listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_path(path: &str) -> (StatusCode, String) {
        let response = health_router()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_and_health_return_static_body() {
        for path in ["/", "/health"] {
            let (status, body) = get_path(path).await;
            assert_eq!(status, StatusCode::OK, "path {}", path);
            assert_eq!(body, HEALTH_BODY);
        }
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (status, _) = get_path("/webhook").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_post_is_rejected() {
        let response = health_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
