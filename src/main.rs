use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use weather_script::{
    app::{ComponentRegistry, build_router},
    config::Config,
    observability,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // パニックも JSON ログに載せる。
    std::panic::set_hook(Box::new(|panic_info| {
        error!(panic = %panic_info, "weather-script panicked");
    }));

    let config = Config::from_env().context("failed to load configuration")?;
    observability::tracing::init(config.otel_exporter_endpoint())
        .context("failed to initialize tracing")?;

    let bind_addr = config.http_bind();
    let router = build_router(
        ComponentRegistry::build(&config).context("failed to build component registry")?,
    );
    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind listener on {bind_addr}"))?;
    info!(%bind_addr, "weather-script listening");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server stopped unexpectedly");

    observability::tracing::shutdown();
    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(err) => {
            error!(error = %err, "cannot listen for ctrl-c, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}
