//! Preview 사용자 결정
//!
//! 검증된 토큰을 preview 권한을 가진 사용자 ID로 바꿉니다.
//! `0`은 "권한 없음"을 뜻하는 값이며 실제 사용자로 취급하면 안 됩니다.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::verifier::TokenVerifier;

/// preview 토큰 nonce action
pub const PREVIEW_NONCE_ACTION: &str = "preview_nonce";

/// 익명/거부 sentinel
pub const ANONYMOUS_USER: u64 = 0;

/// 인증된 preview 사용자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreviewIdentity {
    pub user_id: u64,
    pub expires_at: DateTime<Utc>,
}

/// Preview 사용자 결정기
#[derive(Debug, Clone)]
pub struct PreviewAuth {
    verifier: TokenVerifier,
    action: String,
}

impl PreviewAuth {
    /// 기본 action(`preview_nonce`)으로 생성
    pub fn new(verifier: TokenVerifier) -> Self {
        Self::with_action(verifier, PREVIEW_NONCE_ACTION)
    }

    /// action 지정
    pub fn with_action(verifier: TokenVerifier, action: impl Into<String>) -> Self {
        Self {
            verifier,
            action: action.into(),
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    /// 토큰에서 preview 사용자 ID 결정
    ///
    /// 빈 토큰, 변조/만료 토큰, nonce 불일치, `data.user.id` 누락은 모두 [`ANONYMOUS_USER`]입니다.
    pub fn determine_preview_user(&self, token: &str) -> u64 {
        self.determine_preview_user_at(token, Utc::now())
    }

    pub fn determine_preview_user_at(&self, token: &str, now: DateTime<Utc>) -> u64 {
        self.authenticate_at(token, now)
            .map(|identity| identity.user_id)
            .unwrap_or(ANONYMOUS_USER)
    }

    /// 토큰을 preview 사용자로 인증
    ///
    /// 토큰에 `0`이 들어 있어도 실제 사용자가 아니므로 `None`입니다.
    pub fn authenticate(&self, token: &str) -> Option<PreviewIdentity> {
        self.authenticate_at(token, Utc::now())
    }

    pub fn authenticate_at(&self, token: &str, now: DateTime<Utc>) -> Option<PreviewIdentity> {
        if token.is_empty() {
            return None;
        }

        let payload = self.verifier.verify_token_at(token, &self.action, now)?;
        let user_id = payload.user_id().filter(|id| *id != ANONYMOUS_USER)?;

        Some(PreviewIdentity {
            user_id,
            expires_at: payload.expires_at(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{NonceService, SigningKey, TokenGenerator, TokenManager};
    use chrono::Duration;
    use serde_json::Map;

    fn setup() -> (TokenGenerator, PreviewAuth) {
        let key = SigningKey::from_bytes([5u8; 32]);
        let manager = TokenManager::new(&key);
        let nonces = NonceService::new(&key);
        (
            TokenGenerator::new(manager.clone(), nonces.clone()),
            PreviewAuth::new(TokenVerifier::new(manager, nonces)),
        )
    }

    #[test]
    fn test_valid_token_yields_user() {
        let (generator, auth) = setup();
        let token = generator
            .generate_preview_token(99, PREVIEW_NONCE_ACTION, 360)
            .unwrap();

        assert_eq!(auth.determine_preview_user(&token), 99);
    }

    #[test]
    fn test_denied_cases_yield_zero() {
        let (generator, auth) = setup();

        // 빈 토큰
        assert_eq!(auth.determine_preview_user(""), ANONYMOUS_USER);

        // 변조
        assert_eq!(auth.determine_preview_user("v4.local.garbage"), ANONYMOUS_USER);

        // 만료
        let token = generator
            .generate_preview_token(99, PREVIEW_NONCE_ACTION, 360)
            .unwrap();
        let later = Utc::now() + Duration::seconds(361);
        assert_eq!(auth.determine_preview_user_at(&token, later), ANONYMOUS_USER);

        // user.id 누락
        let token = generator
            .generate_token(Map::new(), PREVIEW_NONCE_ACTION, 360)
            .unwrap();
        assert_eq!(auth.determine_preview_user(&token), ANONYMOUS_USER);

        // 다른 action
        let token = generator.generate_preview_token(99, "other", 360).unwrap();
        assert_eq!(auth.determine_preview_user(&token), ANONYMOUS_USER);
    }

    #[test]
    fn test_authenticate_returns_expiry() {
        let (generator, auth) = setup();
        let token = generator
            .generate_preview_token(8, PREVIEW_NONCE_ACTION, 360)
            .unwrap();

        let identity = auth.authenticate(&token).unwrap();
        assert_eq!(identity.user_id, 8);
        assert!(identity.expires_at > Utc::now());

        let zero = generator
            .generate_preview_token(ANONYMOUS_USER, PREVIEW_NONCE_ACTION, 360)
            .unwrap();
        assert!(auth.authenticate(&zero).is_none());
    }

    #[test]
    fn test_custom_action() {
        let key = SigningKey::from_bytes([5u8; 32]);
        let manager = TokenManager::new(&key);
        let nonces = NonceService::new(&key);
        let generator = TokenGenerator::new(manager.clone(), nonces.clone());
        let auth = PreviewAuth::with_action(TokenVerifier::new(manager, nonces), "headless_preview");

        let token = generator.generate_preview_token(3, "headless_preview", 60).unwrap();
        assert_eq!(auth.action(), "headless_preview");
        assert_eq!(auth.determine_preview_user(&token), 3);
    }
}
