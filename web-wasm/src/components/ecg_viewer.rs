//! 心電図ビューア（ズーム・特徴オーバーレイ）

use ecg_scan_common::{ActiveImage, ViewerState};
use leptos::prelude::*;

#[component]
pub fn EcgViewer(
    image: ActiveImage,
    viewer: RwSignal<ViewerState>,
    #[prop(into)] is_analyzing: Signal<bool>,
    on_remove: Callback<()>,
) -> impl IntoView {
    let zoom_percent = move || viewer.with(|v| v.zoom.percent());

    let image_style = move || {
        viewer.with(|v| {
            format!(
                "transform: scale({}); transform-origin: top left; margin-bottom: {}%",
                v.zoom.scale(),
                v.zoom.bottom_margin_percent()
            )
        })
    };

    let markers = move || {
        viewer
            .get()
            .visible_markers()
            .iter()
            .map(|marker| {
                view! {
                    <span
                        class=format!("feature-marker {}", marker.kind.css_class())
                        style=format!("top: {}%; left: {}%", marker.top_percent, marker.left_percent)
                    >
                        {marker.label}
                    </span>
                }
            })
            .collect_view()
    };

    view! {
        <div class="ecg-viewer" class:report=image.likely_ecg_report>
            <div class="viewer-toolbar">
                <span class="file-name">{image.name.clone()}</span>
                <button class="btn btn-small" on:click=move |_| viewer.update(|v| v.zoom_out())>"−"</button>
                <span class="zoom-label">{move || format!("{}%", zoom_percent())}</span>
                <button class="btn btn-small" on:click=move |_| viewer.update(|v| v.zoom_in())>"+"</button>
                <button class="btn btn-small btn-secondary" on:click=move |_| viewer.update(|v| v.reset_zoom())>
                    "Reset"
                </button>
                <button
                    class="btn btn-small btn-secondary"
                    class:active=move || viewer.with(|v| v.show_features)
                    on:click=move |_| viewer.update(|v| v.toggle_features())
                >
                    {move || if viewer.with(|v| v.show_features) { "Hide Features" } else { "Show Features" }}
                </button>
                <button
                    class="btn btn-small btn-tertiary"
                    disabled=move || is_analyzing.get()
                    on:click=move |_| on_remove.run(())
                >
                    "Remove"
                </button>
            </div>
            <div class="viewer-canvas">
                <img src=image.preview.clone() alt=image.name.clone() style=image_style />
                {markers}
            </div>
        </div>
    }
}
