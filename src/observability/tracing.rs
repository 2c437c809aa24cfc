use anyhow::{Context, Error, Result};
use once_cell::sync::OnceCell;
use opentelemetry::{KeyValue, global, trace::TracerProvider};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracer, SdkTracerProvider},
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE_NAME: &str = "weather-script";

static TRACING_INIT: OnceCell<()> = OnceCell::new();
static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

/// Tracing サブスクライバを一度だけ初期化する。
///
/// `otel_endpoint` が与えられた場合は OTLP エクスポーターでトレースを送信する。
/// エクスポーターの構築に失敗したときは JSON の fmt レイヤーだけで続行する。
///
/// # Errors
/// サブスクライバの初期化に失敗した場合はエラーを返す。
pub fn init(otel_endpoint: Option<&str>) -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let (tracer, otel_error) = match otel_endpoint.map(init_tracer).transpose() {
            Ok(tracer) => (tracer, None),
            Err(err) => (None, Some(err)),
        };
        let otel_enabled = tracer.is_some();
        let otel_layer = tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with(tracing_subscriber::fmt::layer().with_target(false).json())
            .with(otel_layer)
            .try_init()
            .context("failed to install tracing subscriber")?;

        match otel_error {
            Some(err) => warn!(
                otel_enabled,
                error = %format!("{err:#}"),
                "OpenTelemetry exporter unavailable, logging only"
            ),
            None => info!(otel_enabled, endpoint = ?otel_endpoint, "tracing initialized"),
        }
        Ok::<(), Error>(())
    })?;
    Ok(())
}

/// OTLP エクスポーター経由の OpenTelemetry トレーサーを作る。
fn init_tracer(endpoint: &str) -> Result<SdkTracer> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("failed to build OTLP span exporter")?;

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", SERVICE_NAME),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build();

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    let tracer = tracer_provider.tracer(SERVICE_NAME);
    global::set_tracer_provider(tracer_provider.clone());
    // 終了時に未送信のスパンを流すため保持しておく。
    let _ = TRACER_PROVIDER.set(tracer_provider);

    Ok(tracer)
}

/// 未送信のスパンをフラッシュしてエクスポーターを閉じる。OTLP 無効時は何もしない。
pub fn shutdown() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(err) = provider.shutdown() {
            warn!(error = %err, "failed to shut down tracer provider");
        }
    }
}
