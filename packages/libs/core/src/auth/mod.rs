//! 인증 관련 타입 및 로직
//!
//! # 개요
//!
//! Preview 토큰은 초안(draft) 콘텐츠를 외부 프론트엔드에서 볼 수 있게 해주는
//! 짧은 수명의 Bearer 자격 증명입니다. 서버에는 저장하지 않습니다(stateless).
//!
//! # 구성 요소
//!
//! - **SigningKey**: 프로세스 전역 32바이트 시크릿
//! - **TokenManager**: PASETO v4.local 발급/검증/재발급
//! - **NonceService**: action + 시간 창 기반 nonce
//! - **TokenGenerator / TokenVerifier**: nonce 바인딩 발급/검증
//! - **PreviewAuth**: 토큰 → preview 사용자 ID (0 = 거부)
//! - **TokenExtractor**: `Authorization: Bearer` 파싱

mod claims;
mod generator;
mod key;
mod manager;
mod nonce;
mod preview;
mod token;
mod verifier;

pub use claims::TokenPayload;
pub use generator::{TokenGenerator, DEFAULT_TOKEN_TTL_SECS};
pub use key::{encode_key, SigningKey};
pub use manager::TokenManager;
pub use nonce::{NonceAge, NonceService, DEFAULT_NONCE_LIFESPAN_SECS};
pub use preview::{PreviewAuth, PreviewIdentity, ANONYMOUS_USER, PREVIEW_NONCE_ACTION};
pub use token::TokenExtractor;
pub use verifier::TokenVerifier;
