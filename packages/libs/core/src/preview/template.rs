//! URL 템플릿 해석
//!
//! 타입별 `url_template`의 `{placeholder}`를 콘텐츠 값으로 치환합니다.
//!
//! # 지원 placeholder
//!
//! - `{ID}`, `{author_ID}`, `{parent_ID}`
//! - `{status}`, `{type}`, `{slug}`, `{template}`
//! - `{uri}`: 경로이므로 인코딩하지 않음
//! - `{token}`: 발급된 preview 토큰
//!
//! 알 수 없는 placeholder는 그대로 남깁니다.

use super::content::PreviewableContent;

/// 템플릿 해석기
pub struct TemplateResolver;

impl TemplateResolver {
    /// 템플릿 해석
    ///
    /// 값이 없는 placeholder는 빈 문자열이 됩니다.
    pub fn resolve(
        template: &str,
        content: &PreviewableContent,
        unique_slug: bool,
        token: Option<&str>,
    ) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };

            let name = &after[..end];
            match Self::value(name, content, unique_slug, token) {
                Some(value) => out.push_str(&value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }

            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }

    fn value(
        name: &str,
        content: &PreviewableContent,
        unique_slug: bool,
        token: Option<&str>,
    ) -> Option<String> {
        let raw = match name {
            "ID" => content.id.to_string(),
            "author_ID" => content.author_id.map(|id| id.to_string()).unwrap_or_default(),
            "parent_ID" => content.parent_id.map(|id| id.to_string()).unwrap_or_default(),
            "status" => content.status.clone(),
            "type" => content.content_type.clone(),
            "slug" => content.preview_slug(unique_slug).unwrap_or_default(),
            "template" => content.template.clone().unwrap_or_default(),
            "token" => token.unwrap_or_default().to_string(),
            "uri" => {
                return Some(
                    content
                        .page_uri()
                        .unwrap_or_default()
                        .trim_start_matches('/')
                        .to_string(),
                )
            }
            _ => return None,
        };

        Some(urlencoding::encode(&raw).into_owned())
    }
}
