//! Bridge 앱 상태

use std::sync::Arc;

use hwp_core::auth::{
    NonceService, PreviewAuth, SigningKey, TokenGenerator, TokenManager, TokenVerifier,
};
use hwp_core::preview::{ContentStore, InMemoryContentStore, PreviewLinkService};

use crate::config::Config;

/// 앱 상태
///
/// 모든 핸들러에서 공유하는 상태입니다. 생성 후 변경되지 않습니다.
pub struct AppState {
    /// 설정
    pub config: Config,

    /// 토큰 재발급용 매니저
    pub manager: TokenManager,

    /// nonce 바인딩 발급기
    pub generator: TokenGenerator,

    /// preview 사용자 결정기
    pub auth: PreviewAuth,

    /// preview 링크 결정
    pub links: PreviewLinkService,
}

impl AppState {
    /// 새 상태 생성
    ///
    /// `HWP_CONTENT_FILE`이 있으면 콘텐츠 목록을 읽고, 없으면 빈 저장소로 시작합니다.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let store = match &config.content_file {
            Some(path) => {
                let yaml = tokio::fs::read_to_string(path).await?;
                let store = InMemoryContentStore::from_yaml(&yaml)?;
                tracing::info!(path = %path.display(), items = store.len(), "content store loaded");
                store
            }
            None => {
                tracing::warn!("HWP_CONTENT_FILE not set, no content is previewable");
                InMemoryContentStore::new()
            }
        };

        Self::with_store(config, Arc::new(store))
    }

    /// 콘텐츠 저장소를 지정해 생성
    pub fn with_store(config: &Config, store: Arc<dyn ContentStore>) -> anyhow::Result<Self> {
        let key = SigningKey::from_material(&config.preview_secret)?;
        let settings = &config.settings;

        let manager = TokenManager::new(&key);
        let nonces = NonceService::with_lifespan(&key, settings.nonce_lifespan_seconds);
        let generator = TokenGenerator::new(manager.clone(), nonces.clone());
        let auth = PreviewAuth::with_action(
            TokenVerifier::new(manager.clone(), nonces),
            settings.nonce_action.clone(),
        );
        let links = PreviewLinkService::new(Arc::new(settings.clone()), store);

        Ok(Self {
            config: config.clone(),
            manager,
            generator,
            auth,
            links,
        })
    }

    /// issuer key 확인
    pub fn is_issuer(&self, key: &str) -> bool {
        !key.is_empty() && self.config.issuer_keys.contains(key)
    }
}

/// 테스트용 상태 (issuer key `issuer-1`, 콘텐츠 42 draft / 44 trash)
#[cfg(test)]
pub(crate) fn test_state() -> Arc<AppState> {
    use std::collections::HashSet;

    use hwp_core::preview::{PreviewSettings, PreviewableContent};

    let config = Config {
        port: 0,
        preview_secret: "wubbalubbadubdubwubbalubbadubdub".to_string(),
        issuer_keys: HashSet::from(["issuer-1".to_string()]),
        settings: PreviewSettings {
            frontend_base_url: "https://example.com".to_string(),
            ..PreviewSettings::default()
        },
        content_file: None,
    };
    let store = InMemoryContentStore::from_items([
        PreviewableContent::new(42, "post", "draft").with_uri("/blog/my-post"),
        PreviewableContent::new(44, "post", "trash").with_uri("/blog/gone"),
    ]);
    Arc::new(AppState::with_store(&config, Arc::new(store)).expect("test state"))
}
