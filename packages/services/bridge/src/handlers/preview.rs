//! /preview 핸들러
//!
//! - `POST /preview/token`: issuer가 콘텐츠 preview 토큰과 링크를 발급
//! - `POST /preview/verify`: Bearer preview 토큰을 사용자 ID로 확인
//! - `POST /preview/refresh`: 유효한 preview 토큰의 만료 연장
//!
//! 검증 실패는 원인과 관계없이 같은 401 응답입니다.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hwp_core::auth::{PreviewIdentity, TokenExtractor, ANONYMOUS_USER};

use crate::error::{BridgeError, Result};
use crate::state::AppState;

/// 토큰 발급 요청
#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    pub content_id: u64,
    pub user_id: u64,

    /// nonce action (기본: 설정의 `nonce_action`)
    #[serde(default)]
    pub action: Option<String>,

    /// 토큰 TTL (기본: 설정의 `token_ttl_seconds`)
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

/// 토큰 발급 응답
#[derive(Debug, Serialize)]
pub struct IssueResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub preview_url: Option<String>,
    pub in_iframe: bool,
}

/// 토큰 재발급 요청
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub ttl_seconds: Option<i64>,
}

/// 토큰 재발급 응답
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// preview 토큰 발급
pub async fn issue_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IssueRequest>,
) -> Result<Json<IssueResponse>> {
    if request.user_id == ANONYMOUS_USER {
        return Err(BridgeError::BadRequest {
            message: "user_id must not be 0".to_string(),
        });
    }

    let ttl = resolve_ttl(&state, request.ttl_seconds)?;
    let action = request
        .action
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| state.config.settings.nonce_action.clone());

    let content = state
        .links
        .previewable_content(request.content_id)
        .ok_or_else(|| BridgeError::NotPreviewable {
            message: format!("content {} is not previewable", request.content_id),
        })?;

    let now = Utc::now();
    let token = state
        .generator
        .generate_preview_token_at(request.user_id, &action, ttl, now)?;
    let expires_at = issued_expiry(&state, &token, now)?;

    let link = state.links.link_for(&content, &token);

    tracing::info!(
        content_id = request.content_id,
        user_id = request.user_id,
        ttl,
        has_url = link.is_some(),
        "preview token issued"
    );

    Ok(Json(IssueResponse {
        token,
        expires_at,
        in_iframe: link.as_ref().map(|l| l.in_iframe).unwrap_or(false),
        preview_url: link.map(|l| l.url),
    }))
}

/// preview 토큰 확인
pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<PreviewIdentity>> {
    let token = bearer_token(&headers);

    let identity = state.auth.authenticate(&token).ok_or_else(|| {
        tracing::debug!("preview token rejected");
        BridgeError::Unauthorized
    })?;

    Ok(Json(identity))
}

/// preview 토큰 재발급
///
/// nonce가 유효한 토큰만 재발급합니다. 재발급 토큰은 기존 nonce를 그대로 가지므로
/// nonce 수명이 지나면 더 이상 연장되지 않습니다. 본문은 생략할 수 있습니다.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RefreshResponse>> {
    let token = bearer_token(&headers);
    let request = parse_refresh_body(&body)?;
    let ttl = resolve_ttl(&state, request.ttl_seconds)?;

    let now = Utc::now();
    let identity = state.auth.authenticate_at(&token, now).ok_or_else(|| {
        tracing::debug!("refresh rejected");
        BridgeError::Unauthorized
    })?;

    let refreshed = state
        .manager
        .refresh_token_at(&token, ttl, now)?
        .ok_or(BridgeError::Unauthorized)?;
    let expires_at = issued_expiry(&state, &refreshed, now)?;

    tracing::info!(user_id = identity.user_id, ttl, "preview token refreshed");

    Ok(Json(RefreshResponse {
        token: refreshed,
        expires_at,
    }))
}

fn bearer_token(headers: &HeaderMap) -> String {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    TokenExtractor::get_token(header)
}

fn parse_refresh_body(body: &[u8]) -> Result<RefreshRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RefreshRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| BridgeError::BadRequest {
        message: format!("invalid refresh body: {}", e),
    })
}

/// 요청 TTL 결정
///
/// nonce는 lifespan/2 동안만 유효함이 보장되므로 그보다 긴 TTL은 거부합니다.
fn resolve_ttl(state: &AppState, requested: Option<i64>) -> Result<i64> {
    let settings = &state.config.settings;
    let ttl = requested.unwrap_or(settings.token_ttl_seconds);
    if ttl <= 0 {
        return Err(BridgeError::BadRequest {
            message: "ttl_seconds must be positive".to_string(),
        });
    }

    let max_ttl = settings.nonce_lifespan_seconds / 2;
    if ttl > max_ttl {
        return Err(BridgeError::BadRequest {
            message: format!("ttl_seconds must not exceed {}", max_ttl),
        });
    }
    Ok(ttl)
}

/// 방금 발급한 토큰의 만료 시각
fn issued_expiry(state: &AppState, token: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    state
        .manager
        .verify_token_at(token, now)
        .map(|payload| payload.expires_at())
        .ok_or_else(|| BridgeError::Internal {
            message: "issued token failed to verify".to_string(),
        })
}
