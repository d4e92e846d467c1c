//! Bridge 미들웨어
//!
//! 요청 ID 부여, issuer key 인증을 정의합니다.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use hwp_core::auth::TokenExtractor;
use uuid::Uuid;

use crate::error::BridgeError;
use crate::state::AppState;

#[derive(Clone, Debug)]
pub struct RequestId(#[allow(dead_code)] pub String);

tokio::task_local! {
    static REQUEST_ID: String;
}

pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(id.clone()));
    let mut resp = REQUEST_ID.scope(id.clone(), async move { next.run(req).await }).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert("x-request-id", value);
    }
    resp
}

/// issuer key 인증
///
/// 토큰 발급은 `HWP_ISSUER_KEYS`에 등록된 키를 `Authorization: Bearer`로 보낸 호출자만 허용합니다.
pub async fn require_issuer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, BridgeError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let key = TokenExtractor::get_token(header);

    if key.is_empty() {
        tracing::debug!("missing issuer key");
        return Err(BridgeError::Forbidden {
            message: "issuer key required".to_string(),
        });
    }

    if !state.is_issuer(&key) {
        tracing::debug!("unknown issuer key");
        return Err(BridgeError::Forbidden {
            message: "invalid issuer key".to_string(),
        });
    }

    Ok(next.run(request).await)
}
