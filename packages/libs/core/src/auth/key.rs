//! 서명 키
//!
//! 프로세스 전역에서 한 번 로드되는 32바이트 대칭 키입니다.
//! 토큰 암호화(PASETO v4.local)와 nonce HMAC 모두 이 키에서 파생됩니다.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// 서명 키 (32 bytes)
///
/// `Debug` 출력에는 키 내용이 포함되지 않습니다.
#[derive(Clone)]
pub struct SigningKey {
    bytes: [u8; 32],
}

impl SigningKey {
    /// 원시 바이트로 생성
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// 키 material 파싱
    ///
    /// # 지원 형식
    /// 1. 64자 hex
    /// 2. base64url (no padding) → 32 bytes
    /// 3. base64 (standard) → 32 bytes
    /// 4. 32바이트 원문 문자열
    pub fn from_material(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::InvalidSigningKey {
                reason: "key material is empty".to_string(),
            });
        }

        parse_key_material(raw)
            .map(Self::from_bytes)
            .ok_or_else(|| Error::InvalidSigningKey {
                reason: "expected 32 bytes as hex, base64url, base64 or raw text".to_string(),
            })
    }

    /// 용도별 하위 키 파생
    ///
    /// 같은 시크릿으로 토큰과 nonce를 모두 다루므로 label로 도메인을 분리합니다.
    pub(crate) fn derive(&self, label: &str) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(&self.bytes)
            .expect("HMAC can take key of any size");
        mac.update(label.as_bytes());

        let mut out = [0u8; 32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// 새 키를 base64url 문자열로 인코딩
pub fn encode_key(bytes: &[u8; 32]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn parse_key_material(raw: &str) -> Option<[u8; 32]> {
    let trimmed = raw.trim();

    if trimmed.len() == 64 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        let bytes = decode_hex(trimmed)?;
        return bytes.as_slice().try_into().ok();
    }

    if let Ok(bytes) = general_purpose::URL_SAFE_NO_PAD.decode(trimmed) {
        if bytes.len() == 32 {
            return bytes.as_slice().try_into().ok();
        }
    }

    if let Ok(bytes) = general_purpose::STANDARD.decode(trimmed) {
        if bytes.len() == 32 {
            return bytes.as_slice().try_into().ok();
        }
    }

    let raw_bytes = trimmed.as_bytes();
    if raw_bytes.len() == 32 {
        return raw_bytes.try_into().ok();
    }

    None
}

pub(crate) fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }

    let mut bytes = Vec::with_capacity(input.len() / 2);
    let mut chars = input.chars();
    while let (Some(h), Some(l)) = (chars.next(), chars.next()) {
        let hi = h.to_digit(16)?;
        let lo = l.to_digit(16)?;
        bytes.push(((hi << 4) | lo) as u8);
    }
    Some(bytes)
}
