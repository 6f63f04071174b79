//! モック解析
//!
//! バックエンドに到達できないときに使うローカル生成ロジック:
//! - 3件の基準値テーブルから1件を等確率で選び、信頼度に ±5 の揺らぎを加える
//! - 固定2件のモック履歴
//! - 履歴エントリのローカル生成（保存失敗時）

use crate::types::{AnalysisResult, HistoryEntry, RiskLevel};
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;

/// 信頼度の揺らぎ幅（±）
pub const CONFIDENCE_JITTER: i16 = 5;

/// 生成IDの長さ
pub const ENTRY_ID_LEN: usize = 9;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const MOCK_THUMBNAIL_URL: &str =
    "https://cdn.pixabay.com/photo/2021/03/16/10/12/heart-6099296_1280.png";

/// モック解析の基準値
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBaseline {
    pub name: &'static str,
    pub confidence: u8,
    pub risk: RiskLevel,
    pub details: &'static [&'static str],
}

/// オフライン時の基準値テーブル
///
/// `catalog::CONDITIONS` とは別に持つ。NSRの所見文がカタログ（心拍数付き）と異なり、
/// モック結果はこちらの文言をそのまま返す。名前・基準信頼度・リスク区分はカタログと一致させる。
pub static MOCK_BASELINES: [MockBaseline; 3] = [
    MockBaseline {
        name: "Normal Sinus Rhythm",
        confidence: 92,
        risk: RiskLevel::Low,
        details: &[
            "Normal P waves preceding each QRS complex",
            "Regular RR intervals",
            "Normal QRS duration (0.08-0.10 seconds)",
            "No significant ST segment abnormalities",
        ],
    },
    MockBaseline {
        name: "Atrial Fibrillation",
        confidence: 88,
        risk: RiskLevel::Medium,
        details: &[
            "Irregular RR intervals",
            "Absence of distinct P waves",
            "Presence of fibrillatory waves",
            "Moderate risk of blood clots and stroke",
        ],
    },
    MockBaseline {
        name: "Myocardial Infarction",
        confidence: 78,
        risk: RiskLevel::High,
        details: &[
            "ST segment elevation > 1mm in multiple leads",
            "Pathological Q waves observed",
            "T wave inversions in affected leads",
            "Reciprocal ST depression in opposite leads",
        ],
    },
];

/// 疾患名で基準値を検索
pub fn baseline_by_name(name: &str) -> Option<&'static MockBaseline> {
    MOCK_BASELINES.iter().find(|b| b.name == name)
}

/// 基準値に ±5 の一様乱数を加える（結果は0-100に収める）
pub fn jitter_confidence<R: Rng + ?Sized>(baseline: u8, rng: &mut R) -> u8 {
    let offset = rng.gen_range(-CONFIDENCE_JITTER..=CONFIDENCE_JITTER);
    (i16::from(baseline) + offset).clamp(0, 100) as u8
}

/// モック解析結果を生成
pub fn synthesize_result<R: Rng + ?Sized>(rng: &mut R) -> AnalysisResult {
    let baseline = &MOCK_BASELINES[rng.gen_range(0..MOCK_BASELINES.len())];

    AnalysisResult {
        prediction: baseline.name.to_string(),
        confidence: jitter_confidence(baseline.confidence, rng),
        risk: baseline.risk,
        details: baseline.details.iter().map(|s| s.to_string()).collect(),
        ecg_type: None,
    }
}

/// 固定のモック履歴（2件）
pub fn mock_history() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry {
            id: "1".to_string(),
            date: fixed_date(2025, 4, 5, 10, 30),
            prediction: "Normal Sinus Rhythm".to_string(),
            confidence: 95,
            risk: RiskLevel::Low,
            thumbnail_url: MOCK_THUMBNAIL_URL.to_string(),
        },
        HistoryEntry {
            id: "2".to_string(),
            date: fixed_date(2025, 3, 22, 14, 15),
            prediction: "Atrial Fibrillation".to_string(),
            confidence: 87,
            risk: RiskLevel::Medium,
            thumbnail_url: MOCK_THUMBNAIL_URL.to_string(),
        },
    ]
}

fn fixed_date(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, min, 0)
        .single()
        .unwrap_or_default()
}

/// 英小文字+数字のランダムID（9文字）
pub fn generate_entry_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ENTRY_ID_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// 保存先に到達できないときの履歴エントリ生成（失敗しない）
pub fn local_history_entry<R: Rng + ?Sized>(
    result: &AnalysisResult,
    image_ref: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> HistoryEntry {
    HistoryEntry {
        id: generate_entry_id(rng),
        date: now,
        prediction: result.prediction.clone(),
        confidence: result.confidence,
        risk: result.risk,
        thumbnail_url: image_ref.to_string(),
    }
}
