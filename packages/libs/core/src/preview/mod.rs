//! Preview 콘텐츠 및 URL 결정
//!
//! - `content`: preview 대상 콘텐츠와 저장소 추상화
//! - `settings`: 설정 및 허용 목록(타입/상태)
//! - `url_generator`: 기본 URL + 경로 + 쿼리 인자 조합
//! - `template`: 타입별 URL 템플릿 해석
//! - `link`: 요청별 preview 링크 결정

mod content;
mod link;
mod settings;
mod template;
mod url_generator;

pub use content::{ContentStore, InMemoryContentStore, PreviewableContent, PUBLISH_STATUS};
pub use link::{PreviewLink, PreviewLinkService};
pub use settings::{ApplicabilityProvider, PostTypeConfig, PreviewSettings, StaticApplicability};
pub use template::TemplateResolver;
pub use url_generator::PreviewUrlGenerator;
