//! CLI 설정

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// CLI 설정
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// 기본 Bridge URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridge_url: Option<String>,

    /// 토큰 발급용 issuer key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_key: Option<String>,
}

impl CliConfig {
    /// 설정 파일 경로
    fn config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot find home directory"))?;
        Ok(home.join(".hwp").join("config.json"))
    }

    /// 설정 로드
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: CliConfig = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 설정 저장
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// 설정 파일 삭제
    pub fn clear() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Bridge URL 결정
    pub fn bridge_url(&self) -> anyhow::Result<String> {
        self.bridge_url
            .clone()
            .or_else(|| std::env::var("HWP_BRIDGE_URL").ok())
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Bridge URL not configured. Use 'hwp config set --bridge-url <url>' or set HWP_BRIDGE_URL"
                )
            })
    }

    /// issuer key 결정
    pub fn issuer_key(&self) -> anyhow::Result<String> {
        self.issuer_key
            .clone()
            .or_else(|| std::env::var("HWP_ISSUER_KEY").ok())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Issuer key not configured. Use 'hwp config set --issuer-key <key>' or set HWP_ISSUER_KEY"
                )
            })
    }
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("bridge_url", &self.bridge_url)
            .field("issuer_key", &self.issuer_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// 로컬 토큰 명령용 서명 시크릿
pub fn preview_secret() -> anyhow::Result<String> {
    std::env::var("HWP_PREVIEW_SECRET")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!("HWP_PREVIEW_SECRET is not set. Generate one with 'hwp keygen'")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_url_is_trimmed() {
        let config = CliConfig {
            bridge_url: Some("http://localhost:3000/".to_string()),
            issuer_key: None,
        };
        assert_eq!(config.bridge_url().unwrap(), "http://localhost:3000");
    }

    #[test]
    fn test_empty_config_round_trip() {
        let json = serde_json::to_string(&CliConfig::default()).unwrap();
        assert_eq!(json, "{}");
        let config: CliConfig = serde_json::from_str(&json).unwrap();
        assert!(config.bridge_url.is_none());
    }

    #[test]
    fn test_debug_redacts_issuer_key() {
        let config = CliConfig {
            bridge_url: None,
            issuer_key: Some("issuer-secret".to_string()),
        };
        assert!(!format!("{:?}", config).contains("issuer-secret"));
    }
}
