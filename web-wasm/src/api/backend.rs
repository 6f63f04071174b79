//! 解析バックエンド連携（ブラウザ版）
//!
//! 呼び出しごとに /health で疎通確認し、到達できなければモックに切り替える。
//! 疎通確認は AbortController で 2 秒に打ち切る。

use chrono::Utc;
use ecg_scan_common::{
    local_history_entry, mock_history, synthesize_result, AnalysisResult, HistoryEntry,
    SaveHistoryRequest,
};
use gloo::timers::callback::Timeout;
use gloo::timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Request, RequestInit, Response};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

const PROBE_TIMEOUT_MS: u32 = 2000;
const MOCK_DELAY_MS: u32 = 1500;

#[derive(Serialize)]
struct AnalyzePayload<'a> {
    image_data: &'a str,
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

fn warn(message: &str, error: &JsValue) {
    web_sys::console::warn_2(&JsValue::from_str(message), error);
}

async fn fetch(request: &Request) -> Result<Response, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let value = JsFuture::from(window.fetch_with_request(request)).await?;
    value.dyn_into()
}

/// 2xxならJSONをデコード、それ以外はエラー
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, JsValue> {
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "API error: {} {}",
            response.status(),
            response.status_text()
        )));
    }
    let json = JsFuture::from(response.json()?).await?;
    Ok(serde_wasm_bindgen::from_value(json)?)
}

fn json_request<B: Serialize>(url: &str, body: &B) -> Result<Request, JsValue> {
    let body = serde_json::to_string(body).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;
    Ok(request)
}

async fn probe(base_url: &str) -> Result<bool, JsValue> {
    let controller = AbortController::new()?;
    let abort = controller.clone();
    // ドロップ時にタイマーは解除される
    let _deadline = Timeout::new(PROBE_TIMEOUT_MS, move || abort.abort());

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_signal(Some(&controller.signal()));

    let request = Request::new_with_str_and_init(&endpoint(base_url, "health"), &opts)?;
    Ok(fetch(&request).await?.ok())
}

/// バックエンドが応答するか
pub async fn is_available(base_url: &str) -> bool {
    match probe(base_url).await {
        Ok(ok) => ok,
        Err(e) => {
            warn("Backend not available, using mock data", &e);
            false
        }
    }
}

async fn analyze_remote(base_url: &str, data_url: &str) -> Result<AnalysisResult, JsValue> {
    let request = json_request(
        &endpoint(base_url, "analyze"),
        &AnalyzePayload { image_data: data_url },
    )?;
    decode(fetch(&request).await?).await
}

async fn fetch_history_remote(base_url: &str) -> Result<Vec<HistoryEntry>, JsValue> {
    let request = Request::new_with_str(&endpoint(base_url, "history"))?;
    decode(fetch(&request).await?).await
}

async fn save_result_remote(
    base_url: &str,
    result: &AnalysisResult,
    image_ref: &str,
) -> Result<HistoryEntry, JsValue> {
    let request = json_request(
        &endpoint(base_url, "history"),
        &SaveHistoryRequest::new(result, image_ref),
    )?;
    decode(fetch(&request).await?).await
}

/// 画像（data URL）を解析。失敗時は待ち時間のあとモック結果
pub async fn analyze_image(base_url: &str, data_url: &str) -> AnalysisResult {
    if is_available(base_url).await {
        match analyze_remote(base_url, data_url).await {
            Ok(result) => return result,
            Err(e) => warn("Error connecting to backend, falling back to mock data", &e),
        }
    }

    log("Using mock analysis data");
    TimeoutFuture::new(MOCK_DELAY_MS).await;
    synthesize_result(&mut rand::thread_rng())
}

pub async fn fetch_history(base_url: &str) -> Vec<HistoryEntry> {
    if is_available(base_url).await {
        match fetch_history_remote(base_url).await {
            Ok(entries) => return entries,
            Err(e) => warn("Error fetching history, using mock data", &e),
        }
    } else {
        log("Using mock history data");
    }
    mock_history()
}

/// 結果を保存。失敗時はローカルでエントリを作る（必ず成功する）
pub async fn save_result(base_url: &str, result: &AnalysisResult, image_ref: &str) -> HistoryEntry {
    if is_available(base_url).await {
        match save_result_remote(base_url, result, image_ref).await {
            Ok(entry) => return entry,
            Err(e) => warn("Error saving analysis result", &e),
        }
    } else {
        log("Using mock save functionality");
    }
    local_history_entry(result, image_ref, Utc::now(), &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_slash() {
        assert_eq!(endpoint("http://localhost:5000/api/", "health"), "http://localhost:5000/api/health");
        assert_eq!(endpoint(DEFAULT_BASE_URL, "history"), "http://localhost:5000/api/history");
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use ecg_scan_common::synth::{baseline_by_name, ENTRY_ID_LEN};
    use ecg_scan_common::RiskLevel;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// 誰も待ち受けていないポート
    const UNREACHABLE: &str = "http://127.0.0.1:9/api";

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            prediction: "Atrial Fibrillation".to_string(),
            confidence: 85,
            risk: RiskLevel::Medium,
            details: vec![],
            ecg_type: None,
        }
    }

    #[wasm_bindgen_test]
    async fn test_unreachable_is_unavailable() {
        assert!(!is_available(UNREACHABLE).await);
    }

    #[wasm_bindgen_test]
    async fn test_history_falls_back_to_mock() {
        let history = fetch_history(UNREACHABLE).await;
        assert_eq!(history, mock_history());
        assert_eq!(history[0].prediction, "Normal Sinus Rhythm");
        assert_eq!(history[1].prediction, "Atrial Fibrillation");
    }

    #[wasm_bindgen_test]
    async fn test_save_falls_back_to_local_entry() {
        let before = Utc::now();
        let entry = save_result(UNREACHABLE, &sample_result(), "data:image/png;base64,AAAA").await;

        assert_eq!(entry.id.len(), ENTRY_ID_LEN);
        assert!(entry.date >= before);
        assert_eq!(entry.prediction, "Atrial Fibrillation");
        assert_eq!(entry.thumbnail_url, "data:image/png;base64,AAAA");
    }

    #[wasm_bindgen_test]
    async fn test_analyze_falls_back_to_mock_catalog() {
        let result = analyze_image(UNREACHABLE, "data:image/png;base64,AAAA").await;

        let baseline = baseline_by_name(&result.prediction).expect("モックカタログ外の疾患");
        assert_eq!(result.risk, baseline.risk);
        assert!(result.confidence.abs_diff(baseline.confidence) <= 5);
        assert!(result.ecg_type.is_none());
    }
}
