//! 토큰 Payload
//!
//! Preview 토큰의 복호화된 내용입니다.
//! 구조: `{ data: { user: { id }, nonce, ... }, exp }`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 검증을 통과한 토큰 Payload
///
/// 생성 후 변경되지 않는 값 객체입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// 발급 시 전달된 데이터
    data: Map<String, Value>,

    /// 만료 시각
    exp: DateTime<Utc>,
}

impl TokenPayload {
    pub(crate) fn new(data: Map<String, Value>, exp: DateTime<Utc>) -> Self {
        Self { data, exp }
    }

    /// Payload 데이터
    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// 만료 시각
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.exp
    }

    /// `data.user.id`
    ///
    /// 정수가 아니거나 없으면 `None`입니다.
    pub fn user_id(&self) -> Option<u64> {
        user_id_of(&self.data)
    }

    /// `data.nonce`
    pub fn nonce(&self) -> Option<&str> {
        self.data.get("nonce").and_then(Value::as_str)
    }

    /// 주어진 시각 기준 만료 여부
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.exp
    }

    /// 남은 TTL (초)
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> i64 {
        let diff = self.exp - now;
        diff.num_seconds().max(0)
    }
}

/// payload data에서 사용자 ID 추출
pub(crate) fn user_id_of(data: &Map<String, Value>) -> Option<u64> {
    data.get("user")
        .and_then(|user| user.get("id"))
        .and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn payload(data: Value, exp: DateTime<Utc>) -> TokenPayload {
        TokenPayload::new(data.as_object().cloned().unwrap(), exp)
    }

    #[test]
    fn test_user_id_and_nonce() {
        let now = Utc::now();
        let p = payload(json!({ "user": { "id": 7 }, "nonce": "abc123" }), now);

        assert_eq!(p.user_id(), Some(7));
        assert_eq!(p.nonce(), Some("abc123"));
    }

    #[test]
    fn test_user_id_requires_integer() {
        let now = Utc::now();
        assert_eq!(payload(json!({ "user": { "id": "7" } }), now).user_id(), None);
        assert_eq!(payload(json!({ "user": {} }), now).user_id(), None);
        assert_eq!(payload(json!({}), now).user_id(), None);
    }

    #[test]
    fn test_expiry_boundaries() {
        let now = Utc::now();
        let p = payload(json!({}), now + Duration::seconds(30));

        assert!(!p.is_expired_at(now));
        assert!(p.is_expired_at(now + Duration::seconds(30)));
        assert_eq!(p.remaining_ttl(now), 30);
        assert_eq!(p.remaining_ttl(now + Duration::seconds(90)), 0);
    }
}
