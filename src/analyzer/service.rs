//! 解析サービス
//!
//! すべてのリモート呼び出しの前に疎通確認を行い、
//! 到達できない・失敗した場合はモック / ローカル生成に切り替える。
//! 呼び出し元には通信エラーを返さない。

use super::probe::{endpoint, probe_backend};
use crate::config::{Config, UploadEncoding};
use crate::error::{EcgScanError, Result};
use crate::scanner::ImageFile;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use ecg_scan_common::intake::to_data_url;
use ecg_scan_common::{
    local_history_entry, mock_history, synthesize_result, AnalysisResult, HistoryEntry,
    SaveHistoryRequest,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// 解析に送る画像
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn from_file(file: &ImageFile) -> Result<Self> {
        Ok(Self {
            file_name: file.file_name.clone(),
            mime: file.mime.clone(),
            bytes: file.read_bytes()?,
        })
    }

    pub fn data_url(&self) -> String {
        to_data_url(&self.mime, &STANDARD.encode(&self.bytes))
    }
}

pub struct AnalysisService {
    client: reqwest::Client,
    base_url: String,
    probe_timeout: Duration,
    request_timeout: Duration,
    mock_delay: Duration,
    encoding: UploadEncoding,
}

impl AnalysisService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            probe_timeout: config.probe_timeout(),
            request_timeout: config.request_timeout(),
            mock_delay: config.mock_delay(),
            encoding: config.encoding,
        }
    }

    pub fn with_encoding(mut self, encoding: UploadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_mock_delay(mut self, delay: Duration) -> Self {
        self.mock_delay = delay;
        self
    }

    pub async fn is_available(&self) -> bool {
        probe_backend(&self.client, &self.base_url, self.probe_timeout).await
    }

    /// 画像を解析（到達不可・失敗時はモック結果）
    pub async fn analyze(&self, image: &ImageUpload) -> AnalysisResult {
        if self.is_available().await {
            match self.analyze_remote(image).await {
                Ok(result) => return result,
                Err(e) => {
                    tracing::warn!(error = %e, "Error connecting to backend, falling back to mock data")
                }
            }
        }

        tracing::info!(delay_ms = self.mock_delay.as_millis() as u64, "Using mock analysis data");
        tokio::time::sleep(self.mock_delay).await;
        synthesize_result(&mut StdRng::from_entropy())
    }

    /// 解析履歴を取得（到達不可・失敗時は固定モック2件）
    pub async fn fetch_history(&self) -> Vec<HistoryEntry> {
        if self.is_available().await {
            match self.fetch_history_remote().await {
                Ok(entries) => return entries,
                Err(e) => tracing::warn!(error = %e, "Error fetching history, using mock data"),
            }
        } else {
            tracing::info!("Using mock history data");
        }

        mock_history()
    }

    /// 解析結果を保存（到達不可・失敗時はローカルでエントリを生成）
    pub async fn save_result(&self, result: &AnalysisResult, image_ref: &str) -> HistoryEntry {
        if self.is_available().await {
            match self.save_result_remote(result, image_ref).await {
                Ok(entry) => return entry,
                Err(e) => tracing::warn!(error = %e, "Error saving analysis result"),
            }
        } else {
            tracing::info!("Using mock save functionality");
        }

        local_history_entry(result, image_ref, Utc::now(), &mut StdRng::from_entropy())
    }

    async fn analyze_remote(&self, image: &ImageUpload) -> Result<AnalysisResult> {
        let url = endpoint(&self.base_url, "analyze");

        let request = match self.encoding {
            UploadEncoding::Multipart => {
                let part = reqwest::multipart::Part::bytes(image.bytes.clone())
                    .file_name(image.file_name.clone())
                    .mime_str(&image.mime)?;
                let form = reqwest::multipart::Form::new().part("image", part);
                self.client.post(&url).multipart(form)
            }
            UploadEncoding::Base64 => self
                .client
                .post(&url)
                .json(&serde_json::json!({ "image_data": image.data_url() })),
        };

        decode_response(request.timeout(self.request_timeout).send().await?).await
    }

    async fn fetch_history_remote(&self) -> Result<Vec<HistoryEntry>> {
        let url = endpoint(&self.base_url, "history");
        decode_response(self.client.get(&url).timeout(self.request_timeout).send().await?).await
    }

    async fn save_result_remote(&self, result: &AnalysisResult, image_ref: &str) -> Result<HistoryEntry> {
        let url = endpoint(&self.base_url, "history");
        let body = SaveHistoryRequest::new(result, image_ref);
        let request = self.client.post(&url).json(&body).timeout(self.request_timeout);
        decode_response(request.send().await?).await
    }
}

/// 2xxならJSONをデコード、それ以外はサーバのエラーメッセージを返す
async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|body| {
                body.get("error")
                    .or_else(|| body.get("message"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "An error occurred".to_string());
        return Err(EcgScanError::Server(format!("{}: {}", status, message)));
    }

    Ok(serde_json::from_slice(&bytes)?)
}
