//! Action nonce
//!
//! 특정 action 문자열과 사용자에 묶인 짧은 값입니다.
//! 일회성이 아니라 시간 창(window) 기반입니다: lifespan을 반으로 나눈 tick 단위로
//! 값이 바뀌며, 현재 tick과 직전 tick의 nonce를 모두 유효로 봅니다.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::key::{decode_hex, SigningKey};

type HmacSha256 = Hmac<Sha256>;

/// 기본 nonce 수명 (1일)
pub const DEFAULT_NONCE_LIFESPAN_SECS: i64 = 86_400;

const NONCE_KEY_LABEL: &str = "hwp-preview-nonce";

/// nonce 바이트 길이 (hex 10자)
const NONCE_BYTES: usize = 5;

/// 검증된 nonce의 나이
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceAge {
    /// 현재 tick에서 생성됨
    Fresh,

    /// 직전 tick에서 생성됨
    Aging,
}

/// Nonce 생성/검증기
#[derive(Clone)]
pub struct NonceService {
    key: [u8; 32],
    lifespan_seconds: i64,
}

impl NonceService {
    /// 기본 수명으로 생성
    pub fn new(signing_key: &SigningKey) -> Self {
        Self::with_lifespan(signing_key, DEFAULT_NONCE_LIFESPAN_SECS)
    }

    /// 수명을 지정해 생성 (최소 2초)
    pub fn with_lifespan(signing_key: &SigningKey, lifespan_seconds: i64) -> Self {
        Self {
            key: signing_key.derive(NONCE_KEY_LABEL),
            lifespan_seconds: lifespan_seconds.max(2),
        }
    }

    pub fn lifespan_seconds(&self) -> i64 {
        self.lifespan_seconds
    }

    /// 주어진 시각의 tick (`ceil(now / (lifespan / 2))`)
    pub fn tick_at(&self, now: DateTime<Utc>) -> i64 {
        let half = self.lifespan_seconds / 2;
        let ts = now.timestamp();
        ts.div_euclid(half) + i64::from(ts.rem_euclid(half) != 0)
    }

    /// nonce 생성
    pub fn create_nonce(&self, action: &str, user_id: u64) -> String {
        self.create_nonce_at(action, user_id, Utc::now())
    }

    pub fn create_nonce_at(&self, action: &str, user_id: u64, now: DateTime<Utc>) -> String {
        let tag = self.mac(self.tick_at(now), action, user_id).finalize().into_bytes();
        tag[..NONCE_BYTES]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// nonce 검증
    ///
    /// action 또는 사용자가 다르거나 두 tick 이상 지난 경우 `None`입니다.
    pub fn verify_nonce(&self, nonce: &str, action: &str, user_id: u64) -> Option<NonceAge> {
        self.verify_nonce_at(nonce, action, user_id, Utc::now())
    }

    pub fn verify_nonce_at(
        &self,
        nonce: &str,
        action: &str,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> Option<NonceAge> {
        let tag = decode_hex(nonce.trim())?;
        if tag.len() != NONCE_BYTES {
            return None;
        }

        let tick = self.tick_at(now);
        if self.mac(tick, action, user_id).verify_truncated_left(&tag).is_ok() {
            return Some(NonceAge::Fresh);
        }
        if self.mac(tick - 1, action, user_id).verify_truncated_left(&tag).is_ok() {
            return Some(NonceAge::Aging);
        }

        None
    }

    fn mac(&self, tick: i64, action: &str, user_id: u64) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(format!("{}|{}|{}", tick, action, user_id).as_bytes());
        mac
    }
}

impl std::fmt::Debug for NonceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceService")
            .field("lifespan_seconds", &self.lifespan_seconds)
            .finish_non_exhaustive()
    }
}
