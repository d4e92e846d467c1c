//! Preview 대상 콘텐츠
//!
//! 토큰 발급 여부와 preview URL을 결정하는 데 필요한 최소한의 콘텐츠 정보입니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// 발행(published) 상태
pub const PUBLISH_STATUS: &str = "publish";

/// Preview 대상 콘텐츠
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewableContent {
    /// 콘텐츠 ID
    pub id: u64,

    /// 콘텐츠 타입 (post, page, ...)
    #[serde(rename = "type")]
    pub content_type: String,

    /// 상태 (draft, publish, trash, ...)
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// 프론트엔드 경로 (예: `/blog/my-post`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,

    /// 페이지 템플릿 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl PreviewableContent {
    /// 새 콘텐츠 생성
    pub fn new(id: u64, content_type: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id,
            content_type: content_type.into(),
            status: status.into(),
            slug: None,
            uri: None,
            title: None,
            author_id: None,
            parent_id: None,
            template: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author_id: u64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// 발행 상태인지 확인
    pub fn is_published(&self) -> bool {
        self.status == PUBLISH_STATUS
    }

    /// 비어 있지 않은 URI
    pub fn page_uri(&self) -> Option<&str> {
        self.uri.as_deref().filter(|uri| !uri.is_empty())
    }

    /// preview에 사용할 slug
    ///
    /// 초안은 slug가 없는 경우가 많습니다. `unique`가 켜져 있으면
    /// 제목과 ID로 `my-title-42` 형태의 slug를 만들고, 제목도 없으면 ID를 사용합니다.
    pub fn preview_slug(&self, unique: bool) -> Option<String> {
        if let Some(slug) = self.slug.as_deref().filter(|s| !s.is_empty()) {
            return Some(slug.to_string());
        }

        if !unique {
            return None;
        }

        let base = self.title.as_deref().map(slugify).unwrap_or_default();
        if base.is_empty() {
            Some(self.id.to_string())
        } else {
            Some(format!("{}-{}", base, self.id))
        }
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// 콘텐츠 저장소
///
/// 외부 CMS를 추상화합니다. 없는 콘텐츠는 `None`이며 에러가 아닙니다.
pub trait ContentStore: Send + Sync {
    fn get_content(&self, id: u64) -> Option<PreviewableContent>;
}

/// 메모리 기반 콘텐츠 저장소
#[derive(Debug, Clone, Default)]
pub struct InMemoryContentStore {
    items: HashMap<u64, PreviewableContent>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 콘텐츠 목록으로 생성 (같은 ID는 뒤의 항목이 우선)
    pub fn from_items(items: impl IntoIterator<Item = PreviewableContent>) -> Self {
        Self {
            items: items.into_iter().map(|item| (item.id, item)).collect(),
        }
    }

    /// YAML 목록에서 로드
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let items: Vec<PreviewableContent> = serde_yaml::from_str(yaml)?;
        Ok(Self::from_items(items))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ContentStore for InMemoryContentStore {
    fn get_content(&self, id: u64) -> Option<PreviewableContent> {
        self.items.get(&id).cloned()
    }
}
