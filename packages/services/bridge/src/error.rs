//! Bridge 에러 타입

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// preview 검증 실패 시 사용자에게 보여주는 유일한 메시지
///
/// 서명/만료/nonce 중 어느 검사에서 실패했는지 노출하지 않습니다.
pub const PREVIEW_UNAVAILABLE: &str = "preview unavailable";

/// Bridge 에러
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bad request: {message}")]
    BadRequest { message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {message}")]
    Forbidden { message: String },

    #[error("not previewable: {message}")]
    NotPreviewable { message: String },

    #[error("internal error: {message}")]
    Internal { message: String },

    #[error("core error: {0}")]
    Core(#[from] hwp_core::Error),
}

/// 에러 응답 JSON
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl BridgeError {
    /// 상태 코드, 에러 코드, 메시지
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            BridgeError::BadRequest { message } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", message.clone())
            }
            BridgeError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "PREVIEW_UNAVAILABLE",
                PREVIEW_UNAVAILABLE.to_string(),
            ),
            BridgeError::Forbidden { message } => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", message.clone())
            }
            BridgeError::NotPreviewable { message } => {
                (StatusCode::NOT_FOUND, "NOT_PREVIEWABLE", message.clone())
            }
            BridgeError::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            BridgeError::Core(e) => {
                let status = StatusCode::from_u16(e.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!("Core error: {:?}", e);
                    (status, e.code(), "An internal error occurred".to_string())
                } else {
                    (status, e.code(), e.to_string())
                }
            }
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
                request_id: crate::middleware::current_request_id(),
            },
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
