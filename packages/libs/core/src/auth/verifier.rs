//! 토큰 검증기
//!
//! "비트 단위로 유효하고 만료되지 않았는가"(Manager)와
//! "이 action에 대해 발급된 것인가"(nonce)를 함께 확인합니다.

use chrono::{DateTime, Utc};

use super::claims::TokenPayload;
use super::manager::TokenManager;
use super::nonce::NonceService;

/// 토큰 검증기
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    manager: TokenManager,
    nonces: NonceService,
}

impl TokenVerifier {
    pub fn new(manager: TokenManager, nonces: NonceService) -> Self {
        Self { manager, nonces }
    }

    /// 서명, 만료, nonce-action 일치 검증
    ///
    /// 실패 사유는 debug 로그로만 남기고 호출자에게는 `None`만 반환합니다.
    pub fn verify_token(&self, token: &str, nonce_action: &str) -> Option<TokenPayload> {
        self.verify_token_at(token, nonce_action, Utc::now())
    }

    pub fn verify_token_at(
        &self,
        token: &str,
        nonce_action: &str,
        now: DateTime<Utc>,
    ) -> Option<TokenPayload> {
        let payload = self.manager.verify_token_at(token, now)?;

        let Some(nonce) = payload.nonce() else {
            tracing::debug!("token rejected: missing nonce");
            return None;
        };

        let user_id = payload.user_id().unwrap_or(0);
        match self.nonces.verify_nonce_at(nonce, nonce_action, user_id, now) {
            Some(age) => {
                tracing::trace!(?age, action = nonce_action, "nonce accepted");
                Some(payload)
            }
            None => {
                tracing::debug!(action = nonce_action, "token rejected: nonce mismatch");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{SigningKey, TokenGenerator};
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn pair() -> (TokenGenerator, TokenVerifier, TokenManager) {
        let key = SigningKey::from_bytes([21u8; 32]);
        let manager = TokenManager::new(&key);
        let nonces = NonceService::new(&key);
        (
            TokenGenerator::new(manager.clone(), nonces.clone()),
            TokenVerifier::new(manager.clone(), nonces),
            manager,
        )
    }

    #[test]
    fn test_matching_action_verifies() {
        let (generator, verifier, _) = pair();
        let token = generator.generate_preview_token(1, "preview_nonce", 360).unwrap();

        let payload = verifier.verify_token(&token, "preview_nonce").unwrap();
        assert_eq!(payload.user_id(), Some(1));
    }

    #[test]
    fn test_other_action_is_rejected() {
        let (generator, verifier, _) = pair();
        let token = generator.generate_preview_token(1, "preview_nonce", 360).unwrap();

        assert!(verifier.verify_token(&token, "delete_post").is_none());
    }

    #[test]
    fn test_missing_nonce_is_rejected() {
        let (_, verifier, manager) = pair();
        let token = manager.generate_token(&json!({ "user": { "id": 1 } }), 360).unwrap();

        assert!(verifier.verify_token(&token, "preview_nonce").is_none());
    }

    #[test]
    fn test_forged_user_breaks_nonce_binding() {
        let (_, verifier, manager) = pair();
        let key = SigningKey::from_bytes([21u8; 32]);
        let nonce = NonceService::new(&key).create_nonce("preview_nonce", 1);

        let token = manager
            .generate_token(&json!({ "user": { "id": 2 }, "nonce": nonce }), 360)
            .unwrap();
        assert!(verifier.verify_token(&token, "preview_nonce").is_none());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let (generator, verifier, _) = pair();
        let issued = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let token = generator
            .generate_token_at(serde_json::Map::new(), "preview_nonce", 360, issued)
            .unwrap();

        assert!(verifier
            .verify_token_at(&token, "preview_nonce", issued + Duration::seconds(10))
            .is_some());
        assert!(verifier
            .verify_token_at(&token, "preview_nonce", issued + Duration::seconds(360))
            .is_none());
    }
}
