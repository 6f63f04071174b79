//! 解析結果カード

use ecg_scan_common::{condition_by_name, AnalysisResult, RiskLevel};
use leptos::prelude::*;

const DISCLAIMER: &str =
    "Note: This analysis is for demonstration purposes only and should not be used for clinical diagnosis.";

fn risk_class(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "risk-low",
        RiskLevel::Medium => "risk-medium",
        RiskLevel::High => "risk-high",
    }
}

/// 解析中の表示
#[component]
pub fn AnalyzingCard() -> impl IntoView {
    view! {
        <div class="analysis-card analyzing">
            <div class="spinner" />
            <p>"Analyzing ECG image..."</p>
            <p class="text-muted">"This usually takes a few seconds"</p>
        </div>
    }
}

#[component]
pub fn AnalysisCard(result: AnalysisResult, on_reset: Callback<()>) -> impl IntoView {
    let condition = condition_by_name(&result.prediction);
    let meter_width = format!("width: {:.0}%", result.risk.meter_fraction() * 100.0);

    let description = condition.and_then(|c| c.description).map(|text| {
        view! {
            <section>
                <h4>"Condition Description"</h4>
                <p>{text}</p>
            </section>
        }
    });

    let treatment = condition.and_then(|c| c.treatment).map(|items| {
        view! {
            <section>
                <h4>"Recommended Management"</h4>
                <ul>{items.iter().map(|item| view! { <li>{*item}</li> }).collect_view()}</ul>
            </section>
        }
    });

    let image_info = result.ecg_type.as_ref().map(|t| {
        let label = if t.is_ecg_report { " (ECG report)" } else { "" };
        view! { <p class="text-muted">{format!("Image: {}x{}{}", t.image_width, t.image_height, label)}</p> }
    });

    view! {
        <div class=format!("analysis-card {}", risk_class(result.risk))>
            <div class="card-header">
                <h3>{result.prediction.clone()}</h3>
                <span class="risk-badge">{result.risk.badge()}</span>
            </div>
            <p class="confidence">{format!("Confidence: {}%", result.confidence)}</p>
            <div class="risk-meter">
                <div class="risk-meter-fill" style=meter_width />
            </div>
            <div class="risk-scale">
                <span>"Low"</span>
                <span>"Medium"</span>
                <span>"High"</span>
            </div>

            {description}

            <section>
                <h4>"ECG Findings"</h4>
                <ul>
                    {result.details.iter().map(|d| view! { <li>{d.clone()}</li> }).collect_view()}
                </ul>
            </section>

            {treatment}
            {image_info}

            <p class="disclaimer">{DISCLAIMER}</p>
            <button class="btn btn-primary" on:click=move |_| on_reset.run(())>
                "Analyze Another Image"
            </button>
        </div>
    }
}
