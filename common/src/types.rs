//! 解析結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - AnalysisResult: 1回の解析結果（リモート or モック）
//! - HistoryEntry: 保存済みの解析履歴
//! - RiskLevel: リスク区分

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// リスク区分（low < medium < high）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// 結果カードのバッジ表示
    pub fn badge(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// リスクバーの塗りつぶし割合（1/3, 2/3, 1）
    pub fn meter_fraction(&self) -> f32 {
        match self {
            RiskLevel::Low => 1.0 / 3.0,
            RiskLevel::Medium => 2.0 / 3.0,
            RiskLevel::High => 1.0,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            _ => Err(format!("Unknown risk level: {}. Use low, medium, or high", s)),
        }
    }
}

/// バックエンドが付与する画像形状の判定情報
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EcgTypeInfo {
    #[serde(default)]
    pub is_ecg_report: bool,
    #[serde(default)]
    pub image_width: u32,
    #[serde(default)]
    pub image_height: u32,
}

/// AI解析結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 判定された疾患名
    pub prediction: String,

    /// 信頼度（0-100の整数%）
    pub confidence: u8,

    pub risk: RiskLevel,

    /// 所見（表示順）
    #[serde(default)]
    pub details: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecg_type: Option<EcgTypeInfo>,
}

/// 履歴から復元した結果に付ける所見
pub const HISTORICAL_DETAILS: [&str; 2] = [
    "This is a historical result.",
    "Detailed analysis information would be loaded here in a real application.",
];

impl AnalysisResult {
    /// 履歴エントリから表示用の結果を組み立てる
    pub fn from_history(entry: &HistoryEntry) -> Self {
        Self {
            prediction: entry.prediction.clone(),
            confidence: entry.confidence,
            risk: entry.risk,
            details: HISTORICAL_DETAILS.iter().map(|s| s.to_string()).collect(),
            ecg_type: None,
        }
    }
}

/// 解析履歴エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,

    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,

    pub prediction: String,
    pub confidence: u8,
    pub risk: RiskLevel,

    /// サムネイル参照（URL / data URL / ファイルパス）
    pub thumbnail_url: String,
}

/// 履歴保存リクエスト（POST /api/history）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveHistoryRequest {
    pub prediction: String,
    pub confidence: u8,
    pub risk: RiskLevel,
    pub thumbnail_url: String,
}

impl SaveHistoryRequest {
    pub fn new(result: &AnalysisResult, image_ref: &str) -> Self {
        Self {
            prediction: result.prediction.clone(),
            confidence: result.confidence,
            risk: result.risk,
            thumbnail_url: image_ref.to_string(),
        }
    }
}

/// 日時文字列をタイムスタンプへ変換
///
/// RFC 3339 を優先し、タイムゾーンなしの `YYYY-MM-DDTHH:MM:SS[.f]` はUTCとして扱う。
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}
