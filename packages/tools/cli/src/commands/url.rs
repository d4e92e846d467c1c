//! preview URL 확인

use std::sync::Arc;

use hwp_core::preview::{
    ContentStore, InMemoryContentStore, PreviewLinkService, PreviewSettings, PreviewableContent,
};

use crate::commands::print_json;
use crate::OutputFormat;

/// 콘텐츠 출처
pub enum ContentSource {
    /// 콘텐츠 목록 YAML
    File(String),
    /// 플래그로 지정한 단일 콘텐츠
    Inline {
        content_type: String,
        status: String,
        uri: Option<String>,
        slug: Option<String>,
        title: Option<String>,
    },
}

impl ContentSource {
    fn into_store(self, id: u64) -> anyhow::Result<InMemoryContentStore> {
        match self {
            ContentSource::File(path) => {
                let yaml = std::fs::read_to_string(&path)?;
                Ok(InMemoryContentStore::from_yaml(&yaml)?)
            }
            ContentSource::Inline {
                content_type,
                status,
                uri,
                slug,
                title,
            } => {
                let mut content = PreviewableContent::new(id, content_type, status);
                if let Some(uri) = uri {
                    content = content.with_uri(uri);
                }
                if let Some(slug) = slug {
                    content = content.with_slug(slug);
                }
                if let Some(title) = title {
                    content = content.with_title(title);
                }
                Ok(InMemoryContentStore::from_items([content]))
            }
        }
    }
}

fn load_settings(path: Option<&str>, frontend: Option<String>) -> anyhow::Result<PreviewSettings> {
    let mut settings = match path {
        Some(path) => PreviewSettings::from_file(path)?,
        None => PreviewSettings::default(),
    };
    if let Some(frontend) = frontend {
        settings.frontend_base_url = frontend;
        settings.validate()?;
    }
    Ok(settings)
}

pub fn resolve(
    format: OutputFormat,
    id: u64,
    token: &str,
    settings: Option<&str>,
    frontend: Option<String>,
    source: ContentSource,
) -> anyhow::Result<()> {
    let settings = load_settings(settings, frontend)?;
    let store: Arc<dyn ContentStore> = Arc::new(source.into_store(id)?);
    let links = PreviewLinkService::new(Arc::new(settings), store);

    let link = links.preview_link(id, token);

    match format {
        OutputFormat::Json => print_json(&link)?,
        OutputFormat::Text => match &link {
            Some(link) => {
                println!("{}", link.url);
                if link.in_iframe {
                    eprintln!("(rendered in iframe)");
                }
            }
            None => println!("(not previewable)"),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_content() {
        let store = ContentSource::Inline {
            content_type: "page".to_string(),
            status: "pending".to_string(),
            uri: Some("/about".to_string()),
            slug: None,
            title: Some("About".to_string()),
        }
        .into_store(5)
        .unwrap();

        let content = store.get_content(5).unwrap();
        assert_eq!(content.content_type, "page");
        assert_eq!(content.uri.as_deref(), Some("/about"));
    }

    #[test]
    fn test_frontend_override_is_validated() {
        assert!(load_settings(None, Some("ftp://example.com".to_string())).is_err());

        let settings = load_settings(None, Some("https://example.com".to_string())).unwrap();
        assert_eq!(settings.frontend_base_url, "https://example.com");
    }
}
