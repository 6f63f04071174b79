//! 疾患カタログ
//!
//! 疾患名 → 説明・リスク区分・所見・治療方針の静的テーブル。
//! 結果カードの「Condition Description」「Recommended Management」表示に使う。

use crate::types::RiskLevel;

/// カタログの1行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionRecord {
    pub name: &'static str,
    /// 基準信頼度（%）
    pub baseline: u8,
    pub risk: RiskLevel,
    pub details: &'static [&'static str],
    pub description: Option<&'static str>,
    pub treatment: Option<&'static [&'static str]>,
}

pub static CONDITIONS: [ConditionRecord; 6] = [
    ConditionRecord {
        name: "Normal Sinus Rhythm",
        baseline: 92,
        risk: RiskLevel::Low,
        details: &[
            "Normal P waves preceding each QRS complex",
            "Regular RR intervals (60-100 bpm)",
            "Normal QRS duration (0.08-0.10 seconds)",
            "No significant ST segment abnormalities",
        ],
        description: Some(
            "A normal heart rhythm originating from the sinus node, the heart's natural pacemaker.",
        ),
        treatment: Some(&[
            "No specific treatment required",
            "Regular health check-ups recommended",
            "Maintain heart-healthy lifestyle",
        ]),
    },
    ConditionRecord {
        name: "Sinus Bradycardia",
        baseline: 90,
        risk: RiskLevel::Low,
        details: &[
            "Normal P waves preceding each QRS complex",
            "Regular but slow rhythm (<60 bpm)",
            "Normal PR interval and QRS duration",
            "Common in athletes and during sleep",
        ],
        description: Some("A slower than normal heart rate originating from the sinus node."),
        treatment: Some(&[
            "Often no treatment needed if asymptomatic",
            "Evaluate and treat underlying causes if present",
            "Pacemaker may be considered in symptomatic cases",
        ]),
    },
    ConditionRecord {
        name: "Atrial Fibrillation",
        baseline: 88,
        risk: RiskLevel::Medium,
        details: &[
            "Irregular RR intervals",
            "Absence of distinct P waves",
            "Presence of fibrillatory waves",
            "Moderate risk of blood clots and stroke",
        ],
        description: Some(
            "An irregular heart rhythm characterized by rapid and disorganized electrical signals in the atria.",
        ),
        treatment: Some(&[
            "Rate control medications (beta-blockers, calcium channel blockers)",
            "Rhythm control medications or cardioversion",
            "Anticoagulation therapy to prevent stroke",
            "Catheter ablation for persistent cases",
        ]),
    },
    ConditionRecord {
        name: "Myocardial Infarction",
        baseline: 78,
        risk: RiskLevel::High,
        details: &[
            "ST segment elevation > 1mm in multiple leads",
            "Pathological Q waves observed",
            "T wave inversions in affected leads",
            "Reciprocal ST depression in opposite leads",
        ],
        description: Some(
            "Heart attack caused by blocked blood flow to heart muscle, resulting in tissue damage.",
        ),
        treatment: Some(&[
            "Immediate reperfusion therapy (PCI or thrombolytics)",
            "Antiplatelet therapy (aspirin, P2Y12 inhibitors)",
            "Beta-blockers, ACE inhibitors, statins",
            "Cardiac rehabilitation program",
        ]),
    },
    ConditionRecord {
        name: "Left Bundle Branch Block",
        baseline: 86,
        risk: RiskLevel::Medium,
        details: &[
            "Wide QRS complex (>0.12 seconds)",
            "Absence of Q waves in leads I, V5, and V6",
            "Slurred, notched R waves in leads I, aVL, V5, V6",
            "ST and T wave abnormalities",
        ],
        description: Some(
            "A conduction delay or block in the left bundle branch of the heart's electrical system.",
        ),
        treatment: Some(&[
            "Treatment of underlying heart disease",
            "Cardiac resynchronization therapy in eligible patients",
            "Regular monitoring of cardiac function",
            "Management of heart failure if present",
        ]),
    },
    ConditionRecord {
        name: "Ventricular Tachycardia",
        baseline: 82,
        risk: RiskLevel::High,
        details: &[
            "Wide QRS complexes (>0.12 seconds)",
            "Heart rate typically >100 bpm",
            "AV dissociation possible",
            "Requires immediate medical attention",
        ],
        description: Some(
            "A fast heart rhythm that originates in the ventricles and can be life-threatening.",
        ),
        treatment: Some(&[
            "Immediate cardioversion for unstable patients",
            "Antiarrhythmic medications (amiodarone, lidocaine)",
            "ICD implantation for prevention",
            "Catheter ablation for recurrent episodes",
        ]),
    },
];

/// 全疾患
pub fn all() -> &'static [ConditionRecord] {
    &CONDITIONS
}

/// 疾患名で検索（完全一致）
pub fn condition_by_name(name: &str) -> Option<&'static ConditionRecord> {
    CONDITIONS.iter().find(|c| c.name == name)
}
