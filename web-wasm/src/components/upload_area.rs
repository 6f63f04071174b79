//! アップロードエリアコンポーネント
//!
//! ドラッグ&ドロップかファイル選択で1枚受け付ける。
//! 画像以外は拒否し、画像はdata URLに読み込んでから渡す。

use ecg_scan_common::{validate_upload, ActiveImage, Error};
use leptos::html::Input;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{DragEvent, File, FileList, FileReader, HtmlInputElement};

#[component]
pub fn UploadArea(
    on_selected: Callback<ActiveImage>,
    on_rejected: Callback<Error>,
) -> impl IntoView {
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref: NodeRef<Input> = NodeRef::new();

    let handle_files = move |files: FileList| {
        // 複数ドロップされても先頭の1枚だけ
        if let Some(file) = files.get(0) {
            accept_file(file, on_selected, on_rejected);
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        if let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) {
            handle_files(files);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(files) = input.files() {
            handle_files(files);
        }
        // 同じファイルを選び直せるように
        input.set_value("");
    };

    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    view! {
        <div
            class="upload-area"
            class:dragover=move || is_dragover.get()
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=move |_| set_is_dragover.set(false)
            on:click=on_click
        >
            <input
                type="file"
                accept="image/*"
                style="display: none"
                node_ref=input_ref
                on:change=on_change
            />
            <div class="upload-icon">"📈"</div>
            <p>"Drag & drop your ECG image here, or click to browse"</p>
            <p class="text-muted">"Supports JPEG, PNG and other image formats (max 5MB recommended)"</p>
        </div>
    }
}

fn accept_file(file: File, on_selected: Callback<ActiveImage>, on_rejected: Callback<Error>) {
    let file_name = file.name();
    let size = file.size() as u64;

    let check = match validate_upload(&file_name, &file.type_(), size) {
        Ok(check) => check,
        Err(e) => {
            on_rejected.run(e);
            return;
        }
    };
    if check.oversized {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "{} exceeds the recommended 5MB ({} bytes)",
            file_name, size
        )));
    }

    let Ok(reader) = FileReader::new() else {
        return;
    };

    let reader_clone = reader.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::ProgressEvent| {
        let Some(data_url) = reader_clone.result().ok().and_then(|r| r.as_string()) else {
            return;
        };
        on_selected.run(
            ActiveImage::new(file_name.clone(), data_url).with_ecg_report(check.likely_ecg_report),
        );
    }) as Box<dyn FnMut(_)>);

    reader.set_onload(Some(closure.as_ref().unchecked_ref()));
    closure.forget();

    let _ = reader.read_as_data_url(&file);
}
