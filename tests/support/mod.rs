//! 結合テスト用ヘルパ
#![allow(dead_code)]

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ecg_scan::config::{Config, UploadEncoding};
use ecg_scan::server::{self, AppState};
use image::{DynamicImage, ImageFormat, RgbImage};
use serde_json::json;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::TcpListener;

/// 指定サイズのPNGを生成
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .expect("PNG生成失敗");
    cursor.into_inner()
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height)).expect("書き込み失敗");
    path
}

pub fn test_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        probe_timeout_ms: 500,
        request_timeout_ms: 1000,
        mock_delay_ms: 0,
        encoding: UploadEncoding::Multipart,
    }
}

/// モックバックエンドをランダムポートで起動し、ベースURLを返す
pub async fn spawn_backend() -> (String, AppState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(Duration::ZERO);
    tokio::spawn(server::serve_listener(listener, state.clone()));
    (format!("http://{}/api", addr), state)
}

/// 接続は受け付けるが一切応答しないサーバ
pub async fn spawn_hung_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        loop {
            if let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        }
    });
    format!("http://{}/api", addr)
}

/// ヘルスチェックだけ成功し、他のAPIは500を返すサーバ
pub async fn spawn_flaky_backend() -> String {
    let failing = || async {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "simulated failure" })),
        )
    };
    let api = Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "healthy" })) }))
        .route("/analyze", axum::routing::post(failing))
        .route("/history", get(failing).post(failing));
    let app = Router::new().nest("/api", api);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}/api", addr)
}

/// ヘルスチェックだけ即答し、他のAPIは応答を返さないサーバ
pub async fn spawn_stalling_backend() -> String {
    let stall = || async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        StatusCode::OK
    };
    let api = Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "healthy" })) }))
        .route("/analyze", axum::routing::post(stall))
        .route("/history", get(stall).post(stall));
    let app = Router::new().nest("/api", api);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}/api", addr)
}

/// 閉じたポート（接続拒否）
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind失敗");
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}
