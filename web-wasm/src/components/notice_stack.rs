//! トースト通知

use ecg_scan_common::{Notice, NoticeKind};
use leptos::prelude::*;

/// 表示中の通知（idは閉じる操作用）
#[derive(Debug, Clone, PartialEq)]
pub struct NoticeItem {
    pub id: u64,
    pub notice: Notice,
}

#[component]
pub fn NoticeStack(
    #[prop(into)] notices: Signal<Vec<NoticeItem>>,
    on_dismiss: Callback<u64>,
) -> impl IntoView {
    view! {
        <div class="notice-stack">
            <For
                each=move || notices.get()
                key=|item| item.id
                children=move |item| {
                    let class = match item.notice.kind {
                        NoticeKind::Info => "notice",
                        NoticeKind::Destructive => "notice destructive",
                    };
                    let id = item.id;
                    view! {
                        <div class=class role="status">
                            <strong>{item.notice.title.clone()}</strong>
                            <p>{item.notice.description.clone()}</p>
                            <button class="notice-close" on:click=move |_| on_dismiss.run(id)>"×"</button>
                        </div>
                    }
                }
            />
        </div>
    }
}
