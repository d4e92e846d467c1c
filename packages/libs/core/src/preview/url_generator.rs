//! Preview URL 생성
//!
//! 프론트엔드 기본 URL과 콘텐츠 경로(또는 초안 경로)를 이어 붙이고 쿼리 인자를 추가합니다.
//! 허용 목록 밖의 콘텐츠나 프론트엔드 URL 미설정은 빈 문자열로 표현합니다.

use std::sync::Arc;

use url::form_urlencoded;

use super::content::PreviewableContent;
use super::settings::ApplicabilityProvider;

/// Preview URL 생성기
#[derive(Clone)]
pub struct PreviewUrlGenerator {
    applicability: Arc<dyn ApplicabilityProvider>,
}

impl PreviewUrlGenerator {
    pub fn new(applicability: Arc<dyn ApplicabilityProvider>) -> Self {
        Self { applicability }
    }

    /// 콘텐츠의 타입/상태가 허용 목록에 있는지 확인
    pub fn is_applicable(&self, content: &PreviewableContent) -> bool {
        self.applicability.is_applicable(content)
    }

    /// Preview URL 생성
    ///
    /// `draft_route`가 비어 있지 않으면 `page_uri` 대신 사용합니다.
    /// 쿼리 인자는 주어진 순서대로 붙습니다.
    pub fn generate_url(
        &self,
        content: &PreviewableContent,
        frontend_base_url: &str,
        page_uri: &str,
        extra_query_args: &[(&str, &str)],
        draft_route: &str,
    ) -> String {
        if frontend_base_url.is_empty() {
            return String::new();
        }

        if !self.is_applicable(content) {
            tracing::debug!(
                id = content.id,
                content_type = %content.content_type,
                status = %content.status,
                "content not applicable for preview"
            );
            return String::new();
        }

        let path = if draft_route.is_empty() {
            page_uri
        } else {
            draft_route
        };

        append_query(join_url(frontend_base_url, path), extra_query_args)
    }
}

impl std::fmt::Debug for PreviewUrlGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewUrlGenerator").finish_non_exhaustive()
    }
}

/// base와 path 사이에 slash가 정확히 하나만 오도록 연결
pub(crate) fn join_url(base: &str, path: &str) -> String {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }

    format!("{}/{}", base.trim_end_matches('/'), path)
}

/// 쿼리 인자 추가 (기존 쿼리가 있으면 `&`로 이어 붙임)
pub(crate) fn append_query(mut url: String, args: &[(&str, &str)]) -> String {
    if args.is_empty() {
        return url;
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in args {
        serializer.append_pair(key, value);
    }
    let query = serializer.finish();

    match url.find('?') {
        None => url.push('?'),
        Some(_) if url.ends_with('?') || url.ends_with('&') => {}
        Some(_) => url.push('&'),
    }
    url.push_str(&query);
    url
}
