//! モック解析バックエンド
//!
//! クライアントが叩くREST面を実装する:
//! - GET  /api/health
//! - POST /api/analyze   (multipart `image` / JSON `{image_data}`)
//! - GET  /api/history
//! - POST /api/history
//!
//! 履歴はプロセス内メモリのみ（新しい順）。

pub mod predict;

use crate::error::Result;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{SubsecRound, Utc};
use ecg_scan_common::intake::split_data_url;
use ecg_scan_common::{HistoryEntry, SaveHistoryRequest};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// 受け付ける最大ボディサイズ（multipartのオーバーヘッド込み）
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const REQUIRED_HISTORY_FIELDS: [&str; 4] = ["prediction", "confidence", "risk", "thumbnailUrl"];

#[derive(Clone)]
pub struct AppState {
    history: Arc<RwLock<Vec<HistoryEntry>>>,
    analysis_delay: Duration,
}

impl AppState {
    /// `analysis_delay` は解析処理の疑似待ち時間
    pub fn new(analysis_delay: Duration) -> Self {
        Self {
            history: Arc::new(RwLock::new(Vec::new())),
            analysis_delay,
        }
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }
}

#[derive(Deserialize)]
struct AnalyzePayload {
    image_data: String,
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/history", get(list_history).post(save_history));

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

/// バインド済みリスナで待ち受ける（終了しない）
pub async fn serve_listener(listener: tokio::net::TcpListener, state: AppState) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(addr = %addr, "Mock ECG backend started");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_listener(listener, state).await
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

async fn analyze(State(state): State<AppState>, request: Request) -> Response {
    let bytes = match read_image_bytes(request).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "No valid image provided"),
        Err(e) => return analysis_failed(e),
    };

    let image = match image::load_from_memory(&bytes) {
        Ok(image) => image,
        Err(e) => return analysis_failed(e.to_string()),
    };

    tokio::time::sleep(state.analysis_delay).await;

    let result = predict::predict(image.width(), image.height(), &mut StdRng::from_entropy());
    tracing::info!(
        prediction = %result.prediction,
        confidence = result.confidence,
        width = image.width(),
        height = image.height(),
        "Analyzed ECG image"
    );
    Json(result).into_response()
}

fn analysis_failed(reason: String) -> Response {
    tracing::warn!(error = %reason, "Could not decode uploaded image");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to analyze ECG image: {}", reason),
    )
}

/// JSON（data URL）かmultipartの `image` フィールドから画像バイト列を取り出す
///
/// 画像が含まれていなければ `Ok(None)`、Base64が壊れていれば `Err`。
async fn read_image_bytes(request: Request) -> std::result::Result<Option<Vec<u8>>, String> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let Ok(Json(payload)) = Json::<AnalyzePayload>::from_request(request, &()).await else {
            return Ok(None);
        };
        let (_, data) = split_data_url(&payload.image_data).map_err(|e| e.to_string())?;
        return STANDARD
            .decode(data.trim())
            .map(Some)
            .map_err(|e| e.to_string());
    }

    if content_type.starts_with("multipart/form-data") {
        let Ok(mut multipart) = Multipart::from_request(request, &()).await else {
            return Ok(None);
        };
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() == Some("image") {
                return field.bytes().await.map(|b| Some(b.to_vec())).map_err(|e| e.to_string());
            }
        }
    }

    Ok(None)
}

async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.read().await.clone())
}

async fn save_history(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    if let Some(missing) = REQUIRED_HISTORY_FIELDS
        .iter()
        .find(|field| body.get(**field).is_none())
    {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Missing required field: {}", missing),
        );
    }

    let request: SaveHistoryRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to save history: {}", e),
            )
        }
    };

    let entry = HistoryEntry {
        id: uuid::Uuid::new_v4().to_string(),
        date: Utc::now().trunc_subsecs(0),
        prediction: request.prediction,
        confidence: request.confidence,
        risk: request.risk,
        thumbnail_url: request.thumbnail_url,
    };

    state.history.write().await.insert(0, entry.clone());
    tracing::debug!(id = %entry.id, "Saved analysis to history");

    Json(entry).into_response()
}
