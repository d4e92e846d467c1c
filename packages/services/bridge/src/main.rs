//! HWP Preview Bridge
//!
//! headless 프론트엔드용 preview 토큰 발급/검증/재발급 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 환경변수 로드
    dotenvy::dotenv().ok();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hwp_bridge=debug,hwp_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 설정 로드
    let config = Config::from_env()?;
    tracing::info!("Starting Bridge with config: {:?}", config);

    if config.issuer_keys.is_empty() {
        tracing::warn!("HWP_ISSUER_KEYS is empty, token issuance is disabled");
    }

    // 앱 상태 초기화
    let state = AppState::new(&config).await?;
    let state = Arc::new(state);

    // 라우터 구성
    let app = create_router(state);

    // 서버 시작
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Bridge listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// 라우터 생성
fn create_router(state: Arc<AppState>) -> Router {
    // issuer key 필요
    let issuer = Router::new()
        .route("/preview/token", post(handlers::preview::issue_token))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_issuer));

    Router::new()
        .merge(issuer)
        .route("/preview/verify", post(handlers::preview::verify_token))
        .route("/preview/refresh", post(handlers::preview::refresh_token))
        // Health check
        .route("/health", get(handlers::health::health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(from_fn(middleware::request_id))
        // State
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::state::test_state;

    fn issue_request(issuer_key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/preview/token")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = issuer_key {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", key));
        }
        builder
            .body(Body::from(json!({ "content_id": 42, "user_id": 7 }).to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_issue_requires_issuer_key() {
        let app = create_router(test_state());

        let missing = app.clone().oneshot(issue_request(None)).await.unwrap();
        assert_eq!(missing.status(), StatusCode::FORBIDDEN);
        assert!(missing.headers().contains_key("x-request-id"));
        let body = body_json(missing).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
        assert!(body["error"]["requestId"].is_string());

        let wrong = app
            .clone()
            .oneshot(issue_request(Some("issuer-2")))
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::FORBIDDEN);

        let valid = app.oneshot(issue_request(Some("issuer-1"))).await.unwrap();
        assert_eq!(valid.status(), StatusCode::OK);
        assert!(valid.headers().contains_key("x-request-id"));
        let body = body_json(valid).await;
        assert!(body["token"].as_str().unwrap().starts_with("v4.local."));
    }

    #[tokio::test]
    async fn test_verify_failure_is_generic() {
        let app = create_router(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/preview/verify")
            .header(header::AUTHORIZATION, "Bearer v4.local.tampered")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "PREVIEW_UNAVAILABLE");
        assert_eq!(body["error"]["message"], "preview unavailable");
    }

    #[tokio::test]
    async fn test_issued_token_verifies_through_router() {
        let app = create_router(test_state());

        let issued = body_json(
            app.clone()
                .oneshot(issue_request(Some("issuer-1")))
                .await
                .unwrap(),
        )
        .await;
        let token = issued["token"].as_str().unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/preview/verify")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["user_id"], 7);
    }

    #[tokio::test]
    async fn test_health() {
        let response = create_router(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }
}
