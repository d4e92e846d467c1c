//! Preview 링크 결정
//!
//! 요청마다 어떤 preview 경로와 쿼리 인자를 쓸지 결정합니다.
//!
//! # 결정 순서
//!
//! 1. 콘텐츠가 없거나 허용 목록 밖이면 링크 없음
//! 2. 타입에 `url_template`이 있으면 템플릿 해석
//! 3. 미발행이거나 URI가 없으면 `draft_route`, 아니면 콘텐츠 URI
//!    (`preview=true&p={id}&token={token}` 추가)

use std::sync::Arc;

use serde::Serialize;

use super::content::{ContentStore, PreviewableContent};
use super::settings::PreviewSettings;
use super::template::TemplateResolver;
use super::url_generator::PreviewUrlGenerator;

/// 결정된 preview 링크
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewLink {
    pub url: String,
    pub in_iframe: bool,
}

/// Preview 링크 서비스
#[derive(Clone)]
pub struct PreviewLinkService {
    settings: Arc<PreviewSettings>,
    store: Arc<dyn ContentStore>,
    urls: PreviewUrlGenerator,
}

impl PreviewLinkService {
    pub fn new(settings: Arc<PreviewSettings>, store: Arc<dyn ContentStore>) -> Self {
        let urls = PreviewUrlGenerator::new(settings.clone());
        Self {
            settings,
            store,
            urls,
        }
    }

    /// preview 가능한 콘텐츠 조회
    ///
    /// 없거나 허용 목록 밖이면 `None`입니다.
    pub fn previewable_content(&self, content_id: u64) -> Option<PreviewableContent> {
        self.store
            .get_content(content_id)
            .filter(|content| self.urls.is_applicable(content))
    }

    /// 콘텐츠 ID로 preview 링크 결정
    pub fn preview_link(&self, content_id: u64, token: &str) -> Option<PreviewLink> {
        let content = self.previewable_content(content_id)?;
        self.link_for(&content, token)
    }

    /// 콘텐츠로 preview 링크 결정
    pub fn link_for(&self, content: &PreviewableContent, token: &str) -> Option<PreviewLink> {
        if !self.urls.is_applicable(content) {
            return None;
        }

        let config = self
            .settings
            .type_config(&content.content_type)
            .cloned()
            .unwrap_or_default();

        if let Some(template) = &config.url_template {
            let url = TemplateResolver::resolve(template, content, config.unique_slug, Some(token));
            return Some(PreviewLink {
                url,
                in_iframe: config.in_iframe,
            });
        }

        let page_uri = content.page_uri().unwrap_or_default();
        let draft_route = if !content.is_published() || page_uri.is_empty() {
            self.settings.draft_route.as_str()
        } else {
            ""
        };

        let id = content.id.to_string();
        let args = [("preview", "true"), ("p", id.as_str()), ("token", token)];

        let url = self.urls.generate_url(
            content,
            &self.settings.frontend_base_url,
            page_uri,
            &args,
            draft_route,
        );

        if url.is_empty() {
            return None;
        }

        Some(PreviewLink {
            url,
            in_iframe: config.in_iframe,
        })
    }
}

impl std::fmt::Debug for PreviewLinkService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewLinkService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{InMemoryContentStore, PostTypeConfig};

    fn service(settings: PreviewSettings) -> PreviewLinkService {
        let store = InMemoryContentStore::from_items([
            PreviewableContent::new(42, "post", "draft").with_uri("/blog/my-post"),
            PreviewableContent::new(43, "post", "publish").with_uri("/blog/live-post"),
            PreviewableContent::new(44, "post", "trash").with_uri("/blog/gone"),
            PreviewableContent::new(45, "page", "pending")
                .with_uri("/about")
                .with_title("About Us"),
        ]);
        PreviewLinkService::new(Arc::new(settings), Arc::new(store))
    }

    fn settings() -> PreviewSettings {
        PreviewSettings {
            frontend_base_url: "https://example.com".to_string(),
            post_statuses: vec!["draft".into(), "pending".into(), "publish".into()],
            ..PreviewSettings::default()
        }
    }

    #[test]
    fn test_content_uri_link() {
        let link = service(settings()).preview_link(42, "tok").unwrap();
        assert_eq!(link.url, "https://example.com/blog/my-post?preview=true&p=42&token=tok");
        assert!(!link.in_iframe);
    }

    #[test]
    fn test_draft_route_for_unpublished() {
        let svc = service(PreviewSettings {
            draft_route: "/api/preview".to_string(),
            ..settings()
        });

        let draft = svc.preview_link(42, "tok").unwrap();
        assert_eq!(draft.url, "https://example.com/api/preview?preview=true&p=42&token=tok");

        let published = svc.preview_link(43, "tok").unwrap();
        assert_eq!(
            published.url,
            "https://example.com/blog/live-post?preview=true&p=43&token=tok"
        );
    }

    #[test]
    fn test_template_link() {
        let mut s = settings();
        s.types.insert(
            "page".to_string(),
            PostTypeConfig {
                url_template: Some("https://front.test/{slug}?id={ID}&token={token}".to_string()),
                in_iframe: true,
                unique_slug: true,
                ..PostTypeConfig::default()
            },
        );

        let link = service(s).preview_link(45, "tok").unwrap();
        assert_eq!(link.url, "https://front.test/about-us-45?id=45&token=tok");
        assert!(link.in_iframe);
    }

    #[test]
    fn test_not_previewable() {
        let svc = service(settings());
        assert!(svc.preview_link(44, "tok").is_none());
        assert!(svc.preview_link(999, "tok").is_none());

        let no_frontend = service(PreviewSettings {
            frontend_base_url: String::new(),
            ..settings()
        });
        assert!(no_frontend.previewable_content(42).is_some());
        assert!(no_frontend.preview_link(42, "tok").is_none());
    }
}
