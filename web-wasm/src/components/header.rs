//! ヘッダーコンポーネント（タブ切替つき）

use ecg_scan_common::Tab;
use leptos::prelude::*;

#[component]
pub fn Header(
    #[prop(into)] tab: Signal<Tab>,
    on_select: Callback<Tab>,
) -> impl IntoView {
    let tab_button = move |target: Tab, label: &'static str| {
        view! {
            <button
                class="tab"
                class:active=move || tab.get() == target
                on:click=move |_| on_select.run(target)
            >
                {label}
            </button>
        }
    };

    view! {
        <header class="header">
            <div class="brand">
                <span class="brand-icon">"🫀"</span>
                <h1>"ECG Scan"</h1>
                <span class="text-muted">"AI-assisted ECG interpretation (demo)"</span>
            </div>
            <nav class="tabs">
                {tab_button(Tab::Analysis, "Analysis")}
                {tab_button(Tab::History, "History")}
            </nav>
        </header>
    }
}
