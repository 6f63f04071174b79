//! メインアプリケーションコンポーネント

use crate::api::backend::{self, DEFAULT_BASE_URL};
use crate::components::{
    analysis_card::{AnalysisCard, AnalyzingCard},
    ecg_viewer::EcgViewer,
    header::Header,
    history_list::HistoryList,
    notice_stack::{NoticeItem, NoticeStack},
    upload_area::UploadArea,
};
use ecg_scan_common::{
    ActiveImage, AnalysisController, AnalysisTicket, Error, HistoryEntry, Phase, Tab, ViewerState,
};
use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 通知を自動で閉じるまでの時間
const NOTICE_TTL_MS: u32 = 5000;

#[component]
pub fn App() -> impl IntoView {
    let controller = RwSignal::new(AnalysisController::new());
    let viewer = RwSignal::new(ViewerState::default());
    let history = RwSignal::new(Vec::<HistoryEntry>::new());
    let (history_loading, set_history_loading) = signal(true);
    let notices = RwSignal::new(Vec::<NoticeItem>::new());
    let next_notice_id = StoredValue::new(0u64);

    let dismiss = move |id: u64| notices.update(|items| items.retain(|item| item.id != id));

    // コントローラに溜まった通知をトーストへ移す
    let flush_notices = move || {
        let drained = controller
            .try_update(|c| c.take_notices())
            .unwrap_or_default();
        for notice in drained {
            let id = next_notice_id.get_value();
            next_notice_id.set_value(id + 1);
            notices.update(|items| items.push(NoticeItem { id, notice }));
            Timeout::new(NOTICE_TTL_MS, move || dismiss(id)).forget();
        }
    };

    // 初回表示時に履歴を読み込む
    spawn_local(async move {
        let entries = backend::fetch_history(DEFAULT_BASE_URL).await;
        history.set(entries);
        set_history_loading.set(false);
    });

    // 解析を実行。完了時にチケットが古ければ結果は捨てる
    let run_analysis = move |ticket: AnalysisTicket, data_url: String| {
        spawn_local(async move {
            let result = backend::analyze_image(DEFAULT_BASE_URL, &data_url).await;
            let applied = controller
                .try_update(|c| c.complete_analysis(ticket, result.clone()))
                .unwrap_or(false);
            if !applied {
                return;
            }
            flush_notices();

            let entry = backend::save_result(DEFAULT_BASE_URL, &result, &data_url).await;
            history.update(|entries| entries.insert(0, entry));
        });
    };

    let on_selected = Callback::new(move |image: ActiveImage| {
        viewer.set(ViewerState::default());
        let data_url = image.preview.clone();
        if let Some(ticket) = controller.try_update(|c| c.select_image(image)) {
            flush_notices();
            run_analysis(ticket, data_url);
        }
    });

    let on_retry = move |data_url: String| {
        if let Some(ticket) = controller.try_update(|c| c.retry()).flatten() {
            run_analysis(ticket, data_url);
        }
    };

    let on_rejected = Callback::new(move |error: Error| {
        controller.update(|c| c.reject_upload(&error));
        flush_notices();
    });

    let on_reset = Callback::new(move |_: ()| {
        controller.update(|c| c.reset());
        viewer.set(ViewerState::default());
    });

    let on_tab = Callback::new(move |tab: Tab| controller.update(|c| c.set_tab(tab)));

    let on_history_select = Callback::new(move |entry: HistoryEntry| {
        controller.update(|c| c.select_history(&entry));
        viewer.set(ViewerState::default());
    });

    let tab = Signal::derive(move || controller.with(|c| c.tab()));
    let is_analyzing = Signal::derive(move || controller.with(|c| c.is_analyzing()));

    let phase = Memo::new(move |_| controller.with(|c| c.phase().clone()));

    let analysis_panel = move || {
        match phase.get() {
            Phase::Idle => view! {
                <UploadArea on_selected=on_selected on_rejected=on_rejected />
            }
            .into_any(),
            Phase::ImageSelected { image } => {
                let data_url = image.preview.clone();
                view! {
                    <div class="analysis-layout">
                        <EcgViewer image=image viewer=viewer is_analyzing=is_analyzing on_remove=on_reset />
                        <div class="analysis-card">
                            <p>"The previous analysis did not finish."</p>
                            <button class="btn btn-primary" on:click=move |_| on_retry(data_url.clone())>
                                "Retry Analysis"
                            </button>
                        </div>
                    </div>
                }
                .into_any()
            }
            Phase::Analyzing { image, .. } => view! {
                <div class="analysis-layout">
                    <EcgViewer image=image viewer=viewer is_analyzing=is_analyzing on_remove=on_reset />
                    <AnalyzingCard />
                </div>
            }
            .into_any(),
            Phase::ResultReady { image, result, .. } => view! {
                <div class="analysis-layout">
                    <EcgViewer image=image viewer=viewer is_analyzing=is_analyzing on_remove=on_reset />
                    <AnalysisCard result=result on_reset=on_reset />
                </div>
            }
            .into_any(),
        }
    };

    view! {
        <div class="container">
            <Header tab=tab on_select=on_tab />

            <main>
                <Show
                    when=move || tab.get() == Tab::Analysis
                    fallback=move || view! {
                        <HistoryList
                            entries=history
                            is_loading=history_loading
                            on_select=on_history_select
                        />
                    }
                >
                    {analysis_panel}
                </Show>
            </main>

            <NoticeStack notices=notices on_dismiss=Callback::new(dismiss) />
        </div>
    }
}
