pub(crate) mod health;
pub(crate) mod metrics;
pub(crate) mod script;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::app::AppState;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics::exporter))
        .route("/api/generate_script", post(script::generate))
        .route("/api/regenerate_script", post(script::regenerate))
        .route("/api/edit_script", post(script::edit))
        .route("/api/script", get(script::current))
        .route("/api/script/export", get(script::export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
