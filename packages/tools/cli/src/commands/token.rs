//! 로컬 토큰 명령어
//!
//! `HWP_PREVIEW_SECRET`으로 Bridge와 같은 키를 유도하므로 Bridge가 발급한 토큰도 검증할 수 있습니다.
//! 단, `--nonce-lifespan`이 Bridge의 `nonce_lifespan_seconds`와 같아야 합니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

use hwp_core::auth::{
    NonceService, PreviewAuth, SigningKey, TokenGenerator, TokenManager, TokenVerifier,
};

use crate::commands::print_json;
use crate::config::preview_secret;
use crate::OutputFormat;

/// 로컬 토큰 서비스
struct LocalTokens {
    manager: TokenManager,
    generator: TokenGenerator,
    verifier: TokenVerifier,
}

impl LocalTokens {
    fn from_secret(secret: &str, nonce_lifespan: i64) -> anyhow::Result<Self> {
        let key = SigningKey::from_material(secret)?;
        let manager = TokenManager::new(&key);
        let nonces = NonceService::with_lifespan(&key, nonce_lifespan);

        Ok(Self {
            generator: TokenGenerator::new(manager.clone(), nonces.clone()),
            verifier: TokenVerifier::new(manager.clone(), nonces),
            manager,
        })
    }

    fn from_env(nonce_lifespan: i64) -> anyhow::Result<Self> {
        Self::from_secret(&preview_secret()?, nonce_lifespan)
    }
}

#[derive(Debug, Serialize)]
struct IssuedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// `--data` JSON 파싱 후 `user.id` 설정
fn token_data(user_id: u64, data: Option<&str>) -> anyhow::Result<Map<String, Value>> {
    let mut map = match data {
        Some(raw) => match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => map,
            _ => anyhow::bail!("--data must be a JSON object"),
        },
        None => Map::new(),
    };
    map.insert("user".to_string(), json!({ "id": user_id }));
    Ok(map)
}

fn issue_at(
    tokens: &LocalTokens,
    user_id: u64,
    action: &str,
    ttl: i64,
    data: Option<&str>,
    now: DateTime<Utc>,
) -> anyhow::Result<IssuedToken> {
    let data = token_data(user_id, data)?;
    let token = tokens.generator.generate_token_at(data, action, ttl, now)?;
    let expires_at = tokens
        .manager
        .verify_token_at(&token, now)
        .map(|payload| payload.expires_at())
        .ok_or_else(|| anyhow::anyhow!("issued token has already expired (ttl {})", ttl))?;

    Ok(IssuedToken { token, expires_at })
}

pub fn issue(
    format: OutputFormat,
    nonce_lifespan: i64,
    user_id: u64,
    action: &str,
    ttl: i64,
    data: Option<&str>,
) -> anyhow::Result<()> {
    let tokens = LocalTokens::from_env(nonce_lifespan)?;
    let issued = issue_at(&tokens, user_id, action, ttl, data, Utc::now())?;
    tracing::debug!(user_id, action, ttl, "token issued");

    match format {
        OutputFormat::Json => print_json(&issued),
        OutputFormat::Text => {
            println!("{}", issued.token);
            eprintln!("expires at {}", issued.expires_at.to_rfc3339());
            Ok(())
        }
    }
}

pub fn verify(format: OutputFormat, nonce_lifespan: i64, token: &str, action: &str) -> anyhow::Result<()> {
    let tokens = LocalTokens::from_env(nonce_lifespan)?;
    let auth = PreviewAuth::with_action(tokens.verifier.clone(), action);
    let identity = auth.authenticate(token);

    match format {
        OutputFormat::Json => print_json(&json!({
            "valid": identity.is_some(),
            "user_id": identity.map(|i| i.user_id).unwrap_or(0),
            "expires_at": identity.map(|i| i.expires_at),
        }))?,
        OutputFormat::Text => match &identity {
            Some(identity) => {
                println!("user_id:    {}", identity.user_id);
                println!("expires_at: {}", identity.expires_at.to_rfc3339());
            }
            None => println!("user_id:    0 (preview unavailable)"),
        },
    }

    if identity.is_none() {
        anyhow::bail!("token rejected");
    }
    Ok(())
}

pub fn refresh(format: OutputFormat, nonce_lifespan: i64, token: &str, ttl: i64) -> anyhow::Result<()> {
    let tokens = LocalTokens::from_env(nonce_lifespan)?;
    let now = Utc::now();

    let refreshed = tokens
        .manager
        .refresh_token_at(token, ttl, now)?
        .ok_or_else(|| anyhow::anyhow!("token rejected"))?;
    let expires_at = tokens
        .manager
        .verify_token_at(&refreshed, now)
        .map(|payload| payload.expires_at())
        .ok_or_else(|| anyhow::anyhow!("refreshed token has already expired (ttl {})", ttl))?;

    let refreshed = IssuedToken {
        token: refreshed,
        expires_at,
    };

    match format {
        OutputFormat::Json => print_json(&refreshed),
        OutputFormat::Text => {
            println!("{}", refreshed.token);
            eprintln!("expires at {}", refreshed.expires_at.to_rfc3339());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hwp_core::auth::DEFAULT_NONCE_LIFESPAN_SECS;

    const SECRET: &str = "wubbalubbadubdubwubbalubbadubdub";

    #[test]
    fn test_issue_then_authenticate() {
        let tokens = LocalTokens::from_secret(SECRET, DEFAULT_NONCE_LIFESPAN_SECS).unwrap();
        let issued = issue_at(&tokens, 9, "preview_nonce", 60, Some(r#"{"post_id":42}"#), Utc::now())
            .unwrap();

        let payload = tokens.manager.verify_token(&issued.token).unwrap();
        assert_eq!(payload.user_id(), Some(9));
        assert_eq!(payload.data().get("post_id"), Some(&json!(42)));

        let auth = PreviewAuth::new(tokens.verifier.clone());
        assert_eq!(auth.determine_preview_user(&issued.token), 9);
    }

    #[test]
    fn test_nonce_lifespan_must_match_issuer() {
        let issued_at = Utc.timestamp_opt(1_700_000_100, 0).unwrap();
        let checked_at = issued_at + chrono::Duration::seconds(250);

        let issuer = LocalTokens::from_secret(SECRET, 600).unwrap();
        let issued = issue_at(&issuer, 9, "preview_nonce", 300, None, issued_at).unwrap();

        let matching = LocalTokens::from_secret(SECRET, 600).unwrap();
        let auth = PreviewAuth::new(matching.verifier);
        assert_eq!(auth.determine_preview_user_at(&issued.token, checked_at), 9);

        let default = LocalTokens::from_secret(SECRET, DEFAULT_NONCE_LIFESPAN_SECS).unwrap();
        let auth = PreviewAuth::new(default.verifier);
        assert_eq!(auth.determine_preview_user_at(&issued.token, checked_at), 0);
    }

    #[test]
    fn test_user_flag_wins_over_data() {
        let data = token_data(3, Some(r#"{"user":{"id":99}}"#)).unwrap();
        assert_eq!(data["user"]["id"], json!(3));
    }

    #[test]
    fn test_data_must_be_object() {
        assert!(token_data(1, Some("[1,2]")).is_err());
        assert!(token_data(1, Some("not json")).is_err());
    }

    #[test]
    fn test_non_positive_ttl_fails() {
        let tokens = LocalTokens::from_secret(SECRET, DEFAULT_NONCE_LIFESPAN_SECS).unwrap();
        assert!(issue_at(&tokens, 1, "preview_nonce", 0, None, Utc::now()).is_err());
    }
}
