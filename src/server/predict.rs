//! モックバックエンドの判定ロジック
//!
//! 画像サイズだけを見る簡易判定。横長で大きい12誘導レポートは正常洞調律とし、
//! それ以外は疾患テーブルからランダムに選ぶ。

use ecg_scan_common::{AnalysisResult, EcgTypeInfo, RiskLevel};
use rand::Rng;

struct ServerCondition {
    name: &'static str,
    confidence_min: u8,
    confidence_max: u8,
    risk: RiskLevel,
    details: &'static [&'static str],
}

const SERVER_CONDITIONS: [ServerCondition; 5] = [
    ServerCondition {
        name: "Normal Sinus Rhythm",
        confidence_min: 88,
        confidence_max: 96,
        risk: RiskLevel::Low,
        details: &[
            "Normal P waves preceding each QRS complex",
            "Regular RR intervals",
            "Normal QRS duration (0.08–0.10 sec)",
            "No significant ST segment abnormalities",
        ],
    },
    ServerCondition {
        name: "Atrial Fibrillation",
        confidence_min: 83,
        confidence_max: 92,
        risk: RiskLevel::Medium,
        details: &[
            "Irregular RR intervals",
            "Absence of distinct P waves",
            "Presence of fibrillatory waves",
            "Moderate risk of stroke",
        ],
    },
    ServerCondition {
        name: "Myocardial Infarction",
        confidence_min: 75,
        confidence_max: 88,
        risk: RiskLevel::High,
        details: &[
            "ST elevation in multiple leads",
            "Pathological Q waves",
            "T wave inversions",
            "Reciprocal ST depression",
        ],
    },
    ServerCondition {
        name: "Left Bundle Branch Block",
        confidence_min: 82,
        confidence_max: 94,
        risk: RiskLevel::Medium,
        details: &[
            "Wide QRS (>0.12 sec)",
            "Absence of Q waves in I, V5, V6",
            "Notched/slurred R waves",
            "ST-T changes in opposite direction",
        ],
    },
    ServerCondition {
        name: "Ventricular Tachycardia",
        confidence_min: 79,
        confidence_max: 90,
        risk: RiskLevel::High,
        details: &[
            "Wide QRS complexes",
            "Heart rate >100 bpm",
            "AV dissociation",
            "Medical emergency – call for help",
        ],
    },
];

const REPORT_DETAILS: [&str; 5] = [
    "Normal P waves preceding each QRS complex",
    "Regular RR intervals (75–85 bpm)",
    "Normal QRS duration (0.08–0.10 sec)",
    "No significant ST segment abnormalities",
    "Normal T wave morphology",
];

fn aspect_ratio(width: u32, height: u32) -> f64 {
    if height == 0 {
        return 0.0;
    }
    f64::from(width) / f64::from(height)
}

/// 横長（縦横比 > 1.5）ならレポート形式
pub fn detect_ecg_type(width: u32, height: u32) -> EcgTypeInfo {
    EcgTypeInfo {
        is_ecg_report: width > height && aspect_ratio(width, height) > 1.5,
        image_width: width,
        image_height: height,
    }
}

/// 大判（1500x1000超）の横長レポートか
pub fn is_full_report(width: u32, height: u32) -> bool {
    width > 1500 && height > 1000 && aspect_ratio(width, height) > 1.5
}

pub fn predict<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> AnalysisResult {
    let ecg_type = detect_ecg_type(width, height);

    if is_full_report(width, height) {
        return AnalysisResult {
            prediction: "Normal Sinus Rhythm".to_string(),
            confidence: 95,
            risk: RiskLevel::Low,
            details: REPORT_DETAILS.iter().map(|s| s.to_string()).collect(),
            ecg_type: Some(ecg_type),
        };
    }

    let selected = &SERVER_CONDITIONS[rng.gen_range(0..SERVER_CONDITIONS.len())];
    AnalysisResult {
        prediction: selected.name.to_string(),
        confidence: rng.gen_range(selected.confidence_min..=selected.confidence_max),
        risk: selected.risk,
        details: selected.details.iter().map(|s| s.to_string()).collect(),
        ecg_type: Some(ecg_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_full_report_is_normal_sinus_rhythm() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = predict(2200, 1400, &mut rng);
        assert_eq!(result.prediction, "Normal Sinus Rhythm");
        assert_eq!(result.confidence, 95);
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.details.len(), 5);
        assert!(result.ecg_type.unwrap().is_ecg_report);
    }

    #[test]
    fn test_small_image_is_random_condition_within_range() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..200 {
            let result = predict(640, 480, &mut rng);
            let condition = SERVER_CONDITIONS
                .iter()
                .find(|c| c.name == result.prediction)
                .expect("未知の疾患名");
            assert!(result.confidence >= condition.confidence_min);
            assert!(result.confidence <= condition.confidence_max);
            assert_eq!(result.risk, condition.risk);
        }
    }

    #[test]
    fn test_detect_ecg_type() {
        assert!(detect_ecg_type(1600, 1000).is_ecg_report);
        assert!(!detect_ecg_type(1500, 1000).is_ecg_report);
        assert!(!detect_ecg_type(800, 1200).is_ecg_report);
        assert!(!detect_ecg_type(10, 0).is_ecg_report);
    }

    #[test]
    fn test_is_full_report_needs_size_and_ratio() {
        assert!(!is_full_report(1600, 1000)); // 高さ不足
        assert!(!is_full_report(1600, 1100)); // 縦横比不足
        assert!(is_full_report(1700, 1100));
    }
}
