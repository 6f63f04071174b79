//! 画像受付チェック（CLI/WASM共通）
//!
//! - 画像MIMEタイプ以外は拒否
//! - 5MB超は警告のみ（拒否しない）
//! - ファイル名・サイズから心電図レポート形式かを推定

use crate::error::{Error, Result};

/// 推奨上限サイズ（超えても受け付ける）
pub const SOFT_SIZE_LIMIT: u64 = 5 * 1024 * 1024;

/// これより大きい画像はレポート形式とみなす
const ECG_REPORT_MIN_BYTES: u64 = 100_000;

/// 受付結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadCheck {
    /// 推奨サイズ超過
    pub oversized: bool,
    /// レポート形式らしい（ビューアで表示）
    pub likely_ecg_report: bool,
}

/// アップロード画像を検査
pub fn validate_upload(file_name: &str, mime: &str, size: u64) -> Result<UploadCheck> {
    if !is_image_mime(mime) {
        return Err(Error::NotAnImage(file_name.to_string()));
    }

    Ok(UploadCheck {
        oversized: size > SOFT_SIZE_LIMIT,
        likely_ecg_report: looks_like_ecg_report(file_name, size),
    })
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// ファイル名に ecg/ekg を含むか、一定サイズ以上ならレポート形式とみなす
pub fn looks_like_ecg_report(file_name: &str, size: u64) -> bool {
    let lower = file_name.to_lowercase();
    lower.contains("ecg") || lower.contains("ekg") || size > ECG_REPORT_MIN_BYTES
}

/// Base64データからData URLを組み立てる
pub fn to_data_url(mime: &str, base64_data: &str) -> String {
    format!("data:{};base64,{}", mime, base64_data)
}

/// Data URLを (MIMEタイプ, Base64データ) に分解
///
/// `data:` 接頭辞のない生Base64はMIME不明（空文字）として扱う。
pub fn split_data_url(data_url: &str) -> Result<(&str, &str)> {
    match data_url.split_once("base64,") {
        Some((header, payload)) => {
            let mime = header
                .strip_prefix("data:")
                .ok_or_else(|| Error::InvalidDataUrl(truncate(data_url)))?
                .trim_end_matches(';');
            Ok((mime, payload))
        }
        None if data_url.starts_with("data:") => Err(Error::InvalidDataUrl(truncate(data_url))),
        None => Ok(("", data_url)),
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(32).collect()
}
