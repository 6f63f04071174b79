//! 結果カード・履歴一覧・カタログのテキスト表示

use chrono::{DateTime, Utc};
use ecg_scan_common::{condition_by_name, AnalysisResult, ConditionRecord, HistoryEntry, RiskLevel};
use std::fmt::Write;

const METER_WIDTH: usize = 12;

const DISCLAIMER: &str =
    "Note: This analysis is for demonstration purposes only and should not be used for clinical diagnosis.";

fn risk_meter(risk: RiskLevel) -> String {
    let filled = (risk.meter_fraction() * METER_WIDTH as f32).round() as usize;
    format!(
        "[{}{}] Low / Medium / High",
        "■".repeat(filled),
        "□".repeat(METER_WIDTH - filled)
    )
}

fn risk_icon(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "✔",
        RiskLevel::Medium | RiskLevel::High => "⚠",
    }
}

/// 履歴の日時表示（例: Apr 5, 2025 • 10:30 AM）
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y • %-I:%M %p").to_string()
}

/// 解析結果カード
///
/// 疾患名がカタログにあれば説明と治療方針も付ける。
pub fn format_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {} [{}]", risk_icon(result.risk), result.prediction, result.risk.badge());
    let _ = writeln!(out, "  Confidence: {}%", result.confidence);
    let _ = writeln!(out, "  Risk Level: {}", risk_meter(result.risk));

    let condition = condition_by_name(&result.prediction);

    if let Some(description) = condition.and_then(|c| c.description) {
        let _ = writeln!(out, "\n  Condition Description");
        let _ = writeln!(out, "    {}", description);
    }

    if !result.details.is_empty() {
        let _ = writeln!(out, "\n  ECG Findings");
        for detail in &result.details {
            let _ = writeln!(out, "    • {}", detail);
        }
    }

    if let Some(treatment) = condition.and_then(|c| c.treatment) {
        let _ = writeln!(out, "\n  Recommended Management");
        for item in treatment {
            let _ = writeln!(out, "    • {}", item);
        }
    }

    if let Some(ecg_type) = &result.ecg_type {
        let _ = writeln!(
            out,
            "\n  Image: {}x{}{}",
            ecg_type.image_width,
            ecg_type.image_height,
            if ecg_type.is_ecg_report { " (ECG report)" } else { "" }
        );
    }

    let _ = writeln!(out, "\n  {}", DISCLAIMER);
    out
}

/// リスク区分で履歴を絞り込む（None なら全件）
pub fn filter_history(entries: Vec<HistoryEntry>, risk: Option<RiskLevel>) -> Vec<HistoryEntry> {
    match risk {
        Some(risk) => entries.into_iter().filter(|e| e.risk == risk).collect(),
        None => entries,
    }
}

/// 解析履歴一覧
pub fn format_history(entries: &[HistoryEntry]) -> String {
    let mut out = String::from("Analysis History\n");

    if entries.is_empty() {
        out.push_str("  No analysis history yet.\n  Analyzed ECGs will appear here.\n");
        return out;
    }

    for entry in entries {
        let _ = writeln!(
            out,
            "  {} {:<28} {:>3}%  {}  [{}]",
            risk_icon(entry.risk),
            entry.prediction,
            entry.confidence,
            format_date(&entry.date),
            entry.id
        );
    }
    out
}

/// カタログ1件の詳細
pub fn format_condition(condition: &ConditionRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}] baseline {}%",
        condition.name,
        condition.risk.badge(),
        condition.baseline
    );
    if let Some(description) = condition.description {
        let _ = writeln!(out, "  {}", description);
    }
    let _ = writeln!(out, "  Findings:");
    for detail in condition.details {
        let _ = writeln!(out, "    • {}", detail);
    }
    if let Some(treatment) = condition.treatment {
        let _ = writeln!(out, "  Management:");
        for item in treatment {
            let _ = writeln!(out, "    • {}", item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecg_scan_common::mock_history;

    #[test]
    fn test_format_result_includes_catalog_info() {
        let result = AnalysisResult {
            prediction: "Atrial Fibrillation".to_string(),
            confidence: 90,
            risk: RiskLevel::Medium,
            details: vec!["Irregular RR intervals".to_string()],
            ecg_type: None,
        };

        let card = format_result(&result);
        assert!(card.contains("Atrial Fibrillation [Medium Risk]"));
        assert!(card.contains("Confidence: 90%"));
        assert!(card.contains("Condition Description"));
        assert!(card.contains("• Irregular RR intervals"));
        assert!(card.contains("Anticoagulation therapy to prevent stroke"));
    }

    #[test]
    fn test_format_result_unknown_condition() {
        let result = AnalysisResult {
            prediction: "Unlisted Rhythm".to_string(),
            confidence: 50,
            risk: RiskLevel::High,
            details: vec![],
            ecg_type: None,
        };

        let card = format_result(&result);
        assert!(!card.contains("Condition Description"));
        assert!(!card.contains("Recommended Management"));
        assert!(card.contains("[■■■■■■■■■■■■]"));
    }

    #[test]
    fn test_format_history() {
        let text = format_history(&mock_history());
        assert!(text.contains("Normal Sinus Rhythm"));
        assert!(text.contains("Apr 5, 2025 • 10:30 AM"));
        assert!(text.contains("Mar 22, 2025 • 2:15 PM"));
    }

    #[test]
    fn test_filter_history_by_risk() {
        let medium = filter_history(mock_history(), Some(RiskLevel::Medium));
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].prediction, "Atrial Fibrillation");

        assert!(filter_history(mock_history(), Some(RiskLevel::High)).is_empty());
        assert_eq!(filter_history(mock_history(), None).len(), 2);
    }

    #[test]
    fn test_format_history_empty() {
        assert!(format_history(&[]).contains("No analysis history yet."));
    }

    #[test]
    fn test_risk_meter() {
        assert_eq!(risk_meter(RiskLevel::Low), "[■■■■□□□□□□□□] Low / Medium / High");
    }
}
