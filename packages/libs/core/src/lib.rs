//! hwp-core: Headless preview 공통 핵심 라이브러리
//!
//! 이 크레이트는 Bridge와 CLI가 공유하는 preview 토큰 및 URL 로직을 제공합니다.
//!
//! # 모듈 구조
//!
//! - `auth`: 서명 키, 토큰 발급/검증, nonce, Bearer 추출, preview 사용자 결정
//! - `preview`: 콘텐츠 모델, 설정, preview URL 생성 및 템플릿 해석
//! - `error`: 공통 에러 타입

pub mod auth;
pub mod error;
pub mod preview;

pub use error::{Error, Result};
