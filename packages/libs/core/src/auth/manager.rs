//! 토큰 발급 및 검증
//!
//! 토큰 인코딩/디코딩의 유일한 주체입니다. 포맷은 PASETO v4.local이며
//! payload는 `{ data, exp }` 두 claim으로 구성됩니다.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rusty_paseto::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::claims::TokenPayload;
use super::key::SigningKey;

const TOKEN_KEY_LABEL: &str = "hwp-preview-token";

/// 토큰 매니저
///
/// 상태를 갖지 않으며 키만 보관합니다. 복제 비용이 작아 각 컴포넌트가 소유합니다.
#[derive(Clone)]
pub struct TokenManager {
    key: [u8; 32],
}

impl TokenManager {
    /// 새 매니저 생성
    pub fn new(signing_key: &SigningKey) -> Self {
        Self {
            key: signing_key.derive(TOKEN_KEY_LABEL),
        }
    }

    fn paseto_key(&self) -> PasetoSymmetricKey<V4, Local> {
        PasetoSymmetricKey::<V4, Local>::from(Key::from(self.key))
    }

    /// 토큰 발급
    ///
    /// `data`는 JSON object로 직렬화되어야 합니다.
    pub fn generate_token<T>(&self, data: &T, expiration_seconds: i64) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        self.generate_token_at(data, expiration_seconds, Utc::now())
    }

    /// 기준 시각을 지정한 토큰 발급
    pub fn generate_token_at<T>(
        &self,
        data: &T,
        expiration_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<String>
    where
        T: Serialize + ?Sized,
    {
        let data = match serde_json::to_value(data) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(Error::encoding("token data must be a JSON object")),
            Err(e) => return Err(Error::encoding(e.to_string())),
        };

        let exp = Duration::try_seconds(expiration_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .and_then(ceil_to_second)
            .ok_or_else(|| Error::encoding("token expiration out of range"))?;

        self.encode(data, exp)
    }

    fn encode(&self, data: Map<String, Value>, exp: DateTime<Utc>) -> Result<String> {
        let exp = exp.to_rfc3339_opts(SecondsFormat::Secs, false);
        let key = self.paseto_key();

        GenericBuilder::<V4, Local>::default()
            .set_claim(
                ExpirationClaim::try_from(exp.as_str())
                    .map_err(|e| Error::encoding(e.to_string()))?,
            )
            .set_claim(
                CustomClaim::try_from(("data", Value::Object(data)))
                    .map_err(|e| Error::encoding(e.to_string()))?,
            )
            .try_encrypt(&key)
            .map_err(|e| Error::encoding(e.to_string()))
    }

    /// 토큰 검증
    ///
    /// 서명 불일치, 구조 손상, 만료는 모두 `None`입니다.
    pub fn verify_token(&self, token: &str) -> Option<TokenPayload> {
        self.verify_token_at(token, Utc::now())
    }

    /// 기준 시각을 지정한 토큰 검증
    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Option<TokenPayload> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }

        let key = self.paseto_key();
        let value = match GenericParser::<V4, Local>::default().parse(token, &key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "token rejected: decryption failed");
                return None;
            }
        };

        let Some(payload) = decode_payload(&value) else {
            tracing::debug!("token rejected: malformed payload");
            return None;
        };

        if payload.is_expired_at(now) {
            tracing::debug!(exp = %payload.expires_at(), "token rejected: expired");
            return None;
        }

        Some(payload)
    }

    /// 토큰 재발급
    ///
    /// 기존 토큰이 유효하면 같은 `data`로 만료만 연장한 새 토큰을 발급합니다.
    /// 기존 토큰이 유효하지 않으면 `Ok(None)`입니다.
    pub fn refresh_token(&self, token: &str, new_expiration_seconds: i64) -> Result<Option<String>> {
        self.refresh_token_at(token, new_expiration_seconds, Utc::now())
    }

    /// 기준 시각을 지정한 토큰 재발급
    pub fn refresh_token_at(
        &self,
        token: &str,
        new_expiration_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        let Some(payload) = self.verify_token_at(token, now) else {
            return Ok(None);
        };

        self.generate_token_at(payload.data(), new_expiration_seconds, now)
            .map(Some)
    }
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager").finish_non_exhaustive()
    }
}

/// 초 단위로 올림
///
/// `exp`는 초 단위로 인코딩되므로 내림하면 `now + ttl` 이전에 만료됩니다.
fn ceil_to_second(t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if t.timestamp_subsec_nanos() == 0 {
        return Some(t);
    }
    DateTime::from_timestamp(t.timestamp().checked_add(1)?, 0)
}

fn decode_payload(value: &Value) -> Option<TokenPayload> {
    let exp = value
        .get("exp")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())?
        .with_timezone(&Utc);

    let data = value.get("data").and_then(Value::as_object).cloned()?;

    Some(TokenPayload::new(data, exp))
}
