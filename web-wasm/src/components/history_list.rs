//! 解析履歴一覧

use chrono::{DateTime, Utc};
use ecg_scan_common::{HistoryEntry, RiskLevel};
use leptos::prelude::*;

/// 例: Apr 5, 2025 • 10:30 AM
fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y • %-I:%M %p").to_string()
}

fn risk_icon(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "✔",
        RiskLevel::Medium | RiskLevel::High => "⚠",
    }
}

#[component]
pub fn HistoryList(
    #[prop(into)] entries: Signal<Vec<HistoryEntry>>,
    #[prop(into)] is_loading: Signal<bool>,
    on_select: Callback<HistoryEntry>,
) -> impl IntoView {
    view! {
        <div class="history-list">
            <h2>"Analysis History"</h2>
            <Show
                when=move || !is_loading.get()
                fallback=|| view! { <p class="text-muted">"Loading history..."</p> }
            >
                <Show
                    when=move || !entries.with(Vec::is_empty)
                    fallback=|| view! {
                        <div class="history-empty">
                            <p>"No analysis history yet."</p>
                            <p class="text-muted">"Analyzed ECGs will appear here."</p>
                        </div>
                    }
                >
                    <For
                        each=move || entries.get()
                        key=|entry| entry.id.clone()
                        children=move |entry| {
                            let date = format_date(&entry.date);
                            let icon = risk_icon(entry.risk);
                            let class = format!("history-item risk-{}", entry.risk.as_str());
                            let prediction = entry.prediction.clone();
                            let confidence = format!("{}%", entry.confidence);
                            let thumbnail = entry.thumbnail_url.clone();
                            view! {
                                <button class=class on:click=move |_| on_select.run(entry.clone())>
                                    <img class="history-thumb" src=thumbnail alt="" />
                                    <div class="history-info">
                                        <h4>{icon}" "{prediction}</h4>
                                        <span class="text-muted">{date}</span>
                                    </div>
                                    <span class="history-confidence">{confidence}</span>
                                </button>
                            }
                        }
                    />
                </Show>
            </Show>
        </div>
    }
}
