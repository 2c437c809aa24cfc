use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::app::AppState;
use crate::script::ScriptRecord;

#[derive(Debug, Serialize)]
pub(crate) struct ScriptResponse {
    status: &'static str,
    script: ScriptRecord,
}

impl ScriptResponse {
    fn success(script: ScriptRecord) -> Json<Self> {
        Json(Self {
            status: "success",
            script,
        })
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

/// `{"status":"error","message":..}` を返すエラー。
#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(err: &anyhow::Error) -> Self {
        error!(error = %format!("{err:#}"), "script request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }

    fn no_script() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "no script has been generated yet".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                status: "error",
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegenerateRequest {
    #[serde(default)]
    instructions: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EditRequest {
    edited_text: String,
}

pub(crate) async fn generate(
    State(state): State<AppState>,
) -> Result<Json<ScriptResponse>, ApiError> {
    let record = state
        .service()
        .generate()
        .await
        .map_err(|err| ApiError::internal(&err))?;
    *state.current_script().write().await = Some(record.clone());
    info!(total_chars = record.total_chars, "script generated");
    Ok(ScriptResponse::success(record))
}

pub(crate) async fn regenerate(
    State(state): State<AppState>,
    Json(request): Json<RegenerateRequest>,
) -> Result<Json<ScriptResponse>, ApiError> {
    let record = state
        .service()
        .regenerate(&request.instructions)
        .await
        .map_err(|err| ApiError::internal(&err))?;
    *state.current_script().write().await = Some(record.clone());
    info!(total_chars = record.total_chars, "script regenerated");
    Ok(ScriptResponse::success(record))
}

/// 原稿がまだ無くても、編集テキストから新しい原稿を作る。
pub(crate) async fn edit(
    State(state): State<AppState>,
    Json(request): Json<EditRequest>,
) -> Json<ScriptResponse> {
    let mut current = state.current_script().write().await;
    let record = state
        .service()
        .apply_edit(current.as_ref(), &request.edited_text);
    *current = Some(record.clone());
    info!(total_chars = record.total_chars, "script edited");
    ScriptResponse::success(record)
}

pub(crate) async fn current(
    State(state): State<AppState>,
) -> Result<Json<ScriptResponse>, ApiError> {
    let current = state.current_script().read().await;
    let record = current.as_ref().ok_or_else(ApiError::no_script)?;
    Ok(ScriptResponse::success(record.clone()))
}

pub(crate) async fn export(State(state): State<AppState>) -> Result<Response, ApiError> {
    let current = state.current_script().read().await;
    let record = current.as_ref().ok_or_else(ApiError::no_script)?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        record.export_text(),
    )
        .into_response())
}
