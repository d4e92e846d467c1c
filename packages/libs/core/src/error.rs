//! 공통 에러 타입
//!
//! 검증 실패(서명 불일치, 만료, nonce 불일치)는 에러가 아니라 `None`으로 표현합니다.
//! 여기에는 호출자에게 반드시 전달되어야 하는 실패만 정의합니다.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Preview 코어 에러
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────────
    // Token Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("token encoding error: {message}")]
    Encoding { message: String },

    #[error("invalid signing key: {reason}")]
    InvalidSigningKey { reason: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("configuration error: {message}")]
    Config { message: String },

    // ─────────────────────────────────────────────────────────────────────────────
    // IO/Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────────
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// HTTP 상태 코드로 변환
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Error::Encoding { .. } | Error::Json(_) => 400,

            // 500 Internal Server Error
            Error::InvalidSigningKey { .. } | Error::Config { .. } | Error::Yaml(_) => 500,
        }
    }

    /// 에러 코드 (클라이언트용)
    pub fn code(&self) -> &'static str {
        match self {
            Error::Encoding { .. } => "TOKEN_ENCODING_ERROR",
            Error::InvalidSigningKey { .. } => "INVALID_SIGNING_KEY",
            Error::Config { .. } => "CONFIG_ERROR",
            Error::Yaml(_) => "YAML_ERROR",
            Error::Json(_) => "JSON_ERROR",
        }
    }

    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Error::Encoding {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::encoding("bad").status_code(), 400);
        assert_eq!(Error::config("missing").status_code(), 500);
        assert_eq!(
            Error::InvalidSigningKey {
                reason: "empty".to_string()
            }
            .code(),
            "INVALID_SIGNING_KEY"
        );
    }
}
