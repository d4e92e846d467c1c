//! Bridge 설정

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use hwp_core::preview::PreviewSettings;

/// Bridge 설정
#[derive(Clone)]
pub struct Config {
    /// 서버 포트
    pub port: u16,

    /// 토큰 서명 시크릿 (로그 출력 금지)
    pub preview_secret: String,

    /// 토큰 발급 엔드포인트용 issuer key 목록
    pub issuer_keys: HashSet<String>,

    /// Preview 설정
    pub settings: PreviewSettings,

    /// 콘텐츠 목록 YAML 파일
    pub content_file: Option<PathBuf>,
}

impl Config {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 조회 함수로 설정 로드
    ///
    /// 설정 파일(`HWP_SETTINGS_FILE`)을 먼저 읽고 개별 환경변수로 덮어씁니다.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let preview_secret = lookup("HWP_PREVIEW_SECRET")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("HWP_PREVIEW_SECRET environment variable is required"))?;

        let port = lookup("HWP_BRIDGE_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()?;

        let issuer_keys = lookup("HWP_ISSUER_KEYS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<HashSet<_>>()
            })
            .unwrap_or_default();

        let mut settings = match lookup("HWP_SETTINGS_FILE") {
            Some(path) => PreviewSettings::from_file(&path)?,
            None => PreviewSettings::default(),
        };

        if let Some(url) = lookup("HWP_FRONTEND_URL") {
            settings.frontend_base_url = url;
        }

        if let Some(route) = lookup("HWP_DRAFT_ROUTE") {
            settings.draft_route = route;
        }

        if let Some(ttl) = lookup("HWP_TOKEN_TTL") {
            settings.token_ttl_seconds = ttl.parse()?;
        }

        if let Some(action) = lookup("HWP_NONCE_ACTION") {
            settings.nonce_action = action;
        }

        settings.validate()?;

        let content_file = lookup("HWP_CONTENT_FILE").map(PathBuf::from);

        Ok(Self {
            port,
            preview_secret,
            issuer_keys,
            settings,
            content_file,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("preview_secret", &"<redacted>")
            .field("issuer_key_count", &self.issuer_keys.len())
            .field("settings", &self.settings)
            .field("content_file", &self.content_file)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_secret_is_required() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("HWP_PREVIEW_SECRET", "  ")])).is_err());
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HWP_PREVIEW_SECRET", "wubbalubbadubdubwubbalubbadubdub"),
            ("HWP_ISSUER_KEYS", "key-a, key-b,,"),
            ("HWP_FRONTEND_URL", "https://example.com"),
            ("HWP_TOKEN_TTL", "120"),
        ]))
        .unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.issuer_keys.len(), 2);
        assert!(config.issuer_keys.contains("key-b"));
        assert_eq!(config.settings.frontend_base_url, "https://example.com");
        assert_eq!(config.settings.token_ttl_seconds, 120);
        assert_eq!(config.settings.nonce_action, "preview_nonce");
        assert!(config.content_file.is_none());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("HWP_PREVIEW_SECRET", "wubbalubbadubdubwubbalubbadubdub"),
            ("HWP_FRONTEND_URL", "not a url"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = Config::from_lookup(lookup(&[(
            "HWP_PREVIEW_SECRET",
            "wubbalubbadubdubwubbalubbadubdub",
        )]))
        .unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("wubbalubba"));
        assert!(debug.contains("<redacted>"));
    }
}
