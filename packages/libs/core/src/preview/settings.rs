//! Preview 설정
//!
//! 토큰 TTL, nonce action, 프론트엔드 URL, 허용 타입/상태 목록을 하나의 값으로 묶습니다.
//! 외부에서 주어지며 코어에서는 읽기만 합니다.
//!
//! # YAML 예시
//!
//! ```yaml
//! frontend_base_url: https://example.com
//! draft_route: /api/preview
//! token_ttl_seconds: 360
//! post_statuses: [draft, pending, private, future]
//! types:
//!   post:
//!     unique_slug: true
//!   page:
//!     url_template: "https://example.com/{uri}?preview=true&p={ID}&token={token}"
//!     in_iframe: true
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::auth::{DEFAULT_NONCE_LIFESPAN_SECS, DEFAULT_TOKEN_TTL_SECS, PREVIEW_NONCE_ACTION};
use crate::error::{Error, Result};

use super::content::PreviewableContent;

/// 타입별 preview URL 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostTypeConfig {
    /// preview 허용 여부
    pub enabled: bool,

    /// URL 템플릿 (`{ID}`, `{slug}`, `{uri}`, `{token}` 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,

    /// iframe 안에서 preview 표시
    pub in_iframe: bool,

    /// slug 없는 초안에 고유 slug 생성
    pub unique_slug: bool,
}

impl Default for PostTypeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_template: None,
            in_iframe: false,
            unique_slug: false,
        }
    }
}

/// Preview 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub token_ttl_seconds: i64,

    pub nonce_action: String,

    pub nonce_lifespan_seconds: i64,

    /// 프론트엔드 기본 URL (비어 있으면 preview URL을 만들지 않음)
    pub frontend_base_url: String,

    /// 범용 초안 preview 경로
    pub draft_route: String,

    /// preview 허용 상태 목록
    pub post_statuses: Vec<String>,

    /// 타입별 설정
    pub types: BTreeMap<String, PostTypeConfig>,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        let mut types = BTreeMap::new();
        types.insert("post".to_string(), PostTypeConfig::default());
        types.insert("page".to_string(), PostTypeConfig::default());

        Self {
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECS,
            nonce_action: PREVIEW_NONCE_ACTION.to_string(),
            nonce_lifespan_seconds: DEFAULT_NONCE_LIFESPAN_SECS,
            frontend_base_url: String::new(),
            draft_route: String::new(),
            post_statuses: ["draft", "pending", "private", "future"]
                .into_iter()
                .map(String::from)
                .collect(),
            types,
        }
    }
}

impl PreviewSettings {
    /// YAML 파싱 및 검증
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: PreviewSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// 파일에서 로드
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read settings file {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// 설정 검증
    pub fn validate(&self) -> Result<()> {
        if self.token_ttl_seconds <= 0 {
            return Err(Error::config("token_ttl_seconds must be positive"));
        }

        if self.nonce_lifespan_seconds < 2 {
            return Err(Error::config("nonce_lifespan_seconds must be at least 2"));
        }

        // nonce는 최소 lifespan/2 동안만 유효함이 보장됩니다
        let min_lifespan = self.token_ttl_seconds.saturating_mul(2);
        if self.nonce_lifespan_seconds < min_lifespan {
            return Err(Error::config(format!(
                "nonce_lifespan_seconds must be at least twice token_ttl_seconds ({})",
                min_lifespan
            )));
        }

        if self.nonce_action.trim().is_empty() {
            return Err(Error::config("nonce_action must not be empty"));
        }

        if !self.frontend_base_url.is_empty() {
            validate_http_url("frontend_base_url", &self.frontend_base_url)?;
        }

        for (name, config) in &self.types {
            if let Some(template) = &config.url_template {
                if template.trim().is_empty() {
                    return Err(Error::config(format!(
                        "url_template for type '{}' must not be empty",
                        name
                    )));
                }
            }
        }

        Ok(())
    }

    /// 타입 설정 조회
    pub fn type_config(&self, content_type: &str) -> Option<&PostTypeConfig> {
        self.types.get(content_type)
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::config(format!("{} is not a valid URL: {}", field, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::config(format!(
            "{} must use http or https, got '{}'",
            field, other
        ))),
    }
}

/// 허용 목록 제공자
///
/// preview 관련 동작이 허용되는 콘텐츠 타입/상태를 알려줍니다.
/// 빈 목록은 "아무것도 허용하지 않음"입니다.
pub trait ApplicabilityProvider: Send + Sync {
    fn post_types_enabled(&self) -> Vec<String>;

    fn post_statuses_enabled(&self) -> Vec<String>;

    /// 타입과 상태가 모두 허용 목록에 있는지 확인
    fn is_applicable(&self, content: &PreviewableContent) -> bool {
        self.post_types_enabled().contains(&content.content_type)
            && self.post_statuses_enabled().contains(&content.status)
    }
}

impl ApplicabilityProvider for PreviewSettings {
    fn post_types_enabled(&self) -> Vec<String> {
        self.types
            .iter()
            .filter(|(_, config)| config.enabled)
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn post_statuses_enabled(&self) -> Vec<String> {
        self.post_statuses.clone()
    }
}

/// 고정된 허용 목록
#[derive(Debug, Clone, Default)]
pub struct StaticApplicability {
    post_types: BTreeSet<String>,
    post_statuses: BTreeSet<String>,
}

impl StaticApplicability {
    pub fn new<T, S>(post_types: T, post_statuses: S) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            post_types: post_types.into_iter().map(Into::into).collect(),
            post_statuses: post_statuses.into_iter().map(Into::into).collect(),
        }
    }
}

impl ApplicabilityProvider for StaticApplicability {
    fn post_types_enabled(&self) -> Vec<String> {
        self.post_types.iter().cloned().collect()
    }

    fn post_statuses_enabled(&self) -> Vec<String> {
        self.post_statuses.iter().cloned().collect()
    }
}
