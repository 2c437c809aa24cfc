use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    api,
    clients::{JmaClient, JmaClientConfig},
    config::Config,
    forecast::collector::{JmaCollector, SnapshotSource, StaticSnapshotSource},
    observability::Telemetry,
    script::ScriptRecord,
    service::ScriptService,
    util::retry::RetryPolicy,
};

#[derive(Clone)]
pub struct AppState {
    registry: Arc<ComponentRegistry>,
}

pub struct ComponentRegistry {
    telemetry: Telemetry,
    service: ScriptService,
    current_script: RwLock<Option<ScriptRecord>>,
}

impl AppState {
    #[must_use]
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn service(&self) -> &ScriptService {
        &self.registry.service
    }

    /// 現在の原稿。生成・再生成・編集のたびに差し替わる。
    pub(crate) fn current_script(&self) -> &RwLock<Option<ScriptRecord>> {
        &self.registry.current_script
    }
}

impl ComponentRegistry {
    /// 構成情報からスナップショットの取得元とサービスを組み立てる。
    ///
    /// `WEATHER_SNAPSHOT_PATH` が設定されていればファイルを、なければ気象庁を取得元にする。
    ///
    /// # Errors
    /// メトリクスの登録や HTTP クライアントの構築に失敗した場合はエラーを返す。
    pub fn build(config: &Config) -> Result<Self> {
        let telemetry = Telemetry::new()?;
        let source: Arc<dyn SnapshotSource> = match config.snapshot_path() {
            Some(path) => Arc::new(StaticSnapshotSource::new(path.clone())),
            None => {
                let client = JmaClient::new(JmaClientConfig {
                    base_url: config.jma_base_url().to_string(),
                    connect_timeout: config.jma_connect_timeout(),
                    total_timeout: config.jma_total_timeout(),
                    retry: RetryPolicy::new(
                        config.http_max_retries(),
                        config.http_backoff_base_ms(),
                        config.http_backoff_cap_ms(),
                    ),
                })
                .context("failed to build JMA client")?;
                Arc::new(JmaCollector::new(
                    Arc::new(client),
                    config.jma_request_interval(),
                ))
            }
        };
        info!(
            source = source.name(),
            target_chars = config.script_target_chars(),
            cache_ttl_secs = config.snapshot_cache_ttl().as_secs(),
            "component registry built"
        );

        let service = ScriptService::new(
            source,
            config.snapshot_cache_ttl(),
            config.script_target_chars(),
            telemetry.clone(),
        );
        Ok(Self::from_parts(service, telemetry))
    }

    /// 組み立て済みのサービスから作る。原稿はまだ無い状態で始まる。
    #[must_use]
    pub fn from_parts(service: ScriptService, telemetry: Telemetry) -> Self {
        Self {
            telemetry,
            service,
            current_script: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn service(&self) -> &ScriptService {
        &self.service
    }
}

pub fn build_router(registry: ComponentRegistry) -> Router {
    let state = AppState::new(registry);
    api::router(state)
}
