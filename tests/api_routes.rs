// ルーターを静的スナップショットで立ち上げ、各エンドポイントの応答を確かめる。
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;
use weather_script::app::{ComponentRegistry, build_router};
use weather_script::forecast::collector::StaticSnapshotSource;
use weather_script::observability::Telemetry;
use weather_script::service::ScriptService;

fn fixture_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data/snapshot.json");
    path
}

fn router_with(path: PathBuf) -> Router {
    let telemetry = Telemetry::new().expect("telemetry");
    let service = ScriptService::new(
        Arc::new(StaticSnapshotSource::new(path)),
        Duration::from_secs(3600),
        500,
        telemetry.clone(),
    );
    build_router(ComponentRegistry::from_parts(service, telemetry))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router responds");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    (status, body.to_vec())
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("json body")
}

#[tokio::test]
async fn health_endpoints_report_status() {
    let router = router_with(fixture_path());

    let (status, body) = send(&router, get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "live");

    let (status, body) = send(&router, get("/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["source"], "static");
}

#[tokio::test]
async fn export_before_generation_is_not_found() {
    let router = router_with(fixture_path());

    let (status, body) = send(&router, get("/api/script/export")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body)["status"], "error");

    let (status, _) = send(&router, get("/api/script")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_then_export_current_script() {
    let router = router_with(fixture_path());

    let (status, body) = send(&router, post_json("/api/generate_script", &Value::Null)).await;
    assert_eq!(status, StatusCode::OK);
    let generated = json(&body);
    assert_eq!(generated["status"], "success");
    let total = generated["script"]["total_chars"].as_u64().expect("total_chars");
    assert!(total > 0);

    let (status, body) = send(&router, get("/api/script")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["script"], generated["script"]);

    let (status, body) = send(&router, get("/api/script/export")).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).expect("utf-8 export");
    assert!(text.contains("【全国天気】"));
    assert!(text.contains(&format!("合計文字数: {total}文字")));
}

#[tokio::test]
async fn regenerate_accepts_instructions() {
    let router = router_with(fixture_path());

    let request = post_json(
        "/api/regenerate_script",
        &serde_json::json!({"instructions": "簡潔にお願いします"}),
    );
    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["status"], "success");
}

#[tokio::test]
async fn edit_replaces_current_script() {
    let router = router_with(fixture_path());

    let request = post_json(
        "/api/edit_script",
        &serde_json::json!({
            "edited_text": "2025年1月1日(水)\n今日の天気予報\n【全国天気】\nテスト内容\n"
        }),
    );
    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    let edited = json(&body);
    assert_eq!(edited["script"]["national-weather"], "テスト内容");
    assert_eq!(edited["script"]["total_chars"], 5);

    let (status, body) = send(&router, get("/api/script")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["script"]["national-weather"], "テスト内容");
}

#[tokio::test]
async fn missing_snapshot_file_is_a_server_error() {
    let router = router_with(PathBuf::from("/nonexistent/weather-snapshot.json"));

    let (status, body) = send(&router, post_json("/api/generate_script", &Value::Null)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = json(&body);
    assert_eq!(error["status"], "error");
    assert!(
        error["message"]
            .as_str()
            .expect("message")
            .contains("failed to read snapshot file")
    );
}

#[tokio::test]
async fn metrics_count_generated_scripts() {
    let router = router_with(fixture_path());
    send(&router, post_json("/api/generate_script", &Value::Null)).await;

    let (status, body) = send(&router, get("/metrics")).await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).expect("utf-8 metrics");
    assert!(text.contains("weather_script_generated_total 1"));
}
