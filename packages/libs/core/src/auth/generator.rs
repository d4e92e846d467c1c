//! Nonce 바인딩 토큰 발급기
//!
//! 발급할 때마다 action에 묶인 새 nonce를 `data.nonce`에 주입한 뒤
//! [`TokenManager`]에 위임합니다.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

use crate::error::Result;

use super::claims::user_id_of;
use super::manager::TokenManager;
use super::nonce::NonceService;

/// 기본 토큰 TTL (초)
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 360;

/// 토큰 발급기
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    manager: TokenManager,
    nonces: NonceService,
}

impl TokenGenerator {
    pub fn new(manager: TokenManager, nonces: NonceService) -> Self {
        Self { manager, nonces }
    }

    /// nonce를 포함한 토큰 발급
    ///
    /// nonce는 `nonce_action`과 `data.user.id`(없으면 0)에 묶입니다.
    /// 호출자가 넣은 `data.nonce`는 덮어씁니다.
    pub fn generate_token(
        &self,
        data: Map<String, Value>,
        nonce_action: &str,
        expiration_seconds: i64,
    ) -> Result<String> {
        self.generate_token_at(data, nonce_action, expiration_seconds, Utc::now())
    }

    pub fn generate_token_at(
        &self,
        mut data: Map<String, Value>,
        nonce_action: &str,
        expiration_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let user_id = user_id_of(&data).unwrap_or(0);
        let nonce = self.nonces.create_nonce_at(nonce_action, user_id, now);
        data.insert("nonce".to_string(), Value::String(nonce));

        self.manager.generate_token_at(&data, expiration_seconds, now)
    }

    /// 사용자 preview 토큰 발급
    ///
    /// payload: `{ data: { user: { id }, nonce }, exp }`
    pub fn generate_preview_token(
        &self,
        user_id: u64,
        nonce_action: &str,
        expiration_seconds: i64,
    ) -> Result<String> {
        self.generate_preview_token_at(user_id, nonce_action, expiration_seconds, Utc::now())
    }

    pub fn generate_preview_token_at(
        &self,
        user_id: u64,
        nonce_action: &str,
        expiration_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let mut data = Map::new();
        data.insert("user".to_string(), json!({ "id": user_id }));
        self.generate_token_at(data, nonce_action, expiration_seconds, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SigningKey;

    fn generator() -> (TokenGenerator, TokenManager, NonceService) {
        let key = SigningKey::from_bytes([11u8; 32]);
        let manager = TokenManager::new(&key);
        let nonces = NonceService::new(&key);
        (
            TokenGenerator::new(manager.clone(), nonces.clone()),
            manager,
            nonces,
        )
    }

    #[test]
    fn test_nonce_is_injected() {
        let (generator, manager, nonces) = generator();
        let token = generator
            .generate_preview_token(12, "preview_nonce", DEFAULT_TOKEN_TTL_SECS)
            .unwrap();

        let payload = manager.verify_token(&token).unwrap();
        assert_eq!(payload.user_id(), Some(12));

        let nonce = payload.nonce().unwrap();
        assert!(nonces.verify_nonce(nonce, "preview_nonce", 12).is_some());
    }

    #[test]
    fn test_caller_nonce_is_overwritten() {
        let (generator, manager, _) = generator();
        let mut data = Map::new();
        data.insert("nonce".to_string(), Value::String("forged".to_string()));

        let token = generator.generate_token(data, "preview_nonce", 60).unwrap();
        let payload = manager.verify_token(&token).unwrap();
        assert_ne!(payload.nonce(), Some("forged"));
    }

    #[test]
    fn test_extra_data_is_preserved() {
        let (generator, manager, _) = generator();
        let mut data = Map::new();
        data.insert("user".to_string(), json!({ "id": 4 }));
        data.insert("post_id".to_string(), json!(42));

        let token = generator.generate_token(data, "preview_nonce", 60).unwrap();
        let payload = manager.verify_token(&token).unwrap();
        assert_eq!(payload.data().get("post_id"), Some(&json!(42)));
    }
}
