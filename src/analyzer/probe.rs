//! バックエンド疎通確認
//!
//! `GET <base>/health` を上限時間付きで叩き、成功ステータスのときだけ true。
//! ネットワークエラー・非2xx・タイムアウトはすべて false（エラーにしない）。

use std::time::Duration;

/// ヘルスチェックの既定上限
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2000);

/// ベースURLとパスを連結
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub async fn probe_backend(client: &reqwest::Client, base_url: &str, timeout: Duration) -> bool {
    let url = endpoint(base_url, "health");
    let request = client.get(&url).timeout(timeout).send();

    // reqwestのタイムアウトに加えて外側でも打ち切る（接続確立前のハングも含める）
    match tokio::time::timeout(timeout, request).await {
        Ok(Ok(response)) => {
            let ok = response.status().is_success();
            if !ok {
                tracing::info!(status = %response.status(), "Backend health check failed, using mock data");
            }
            ok
        }
        Ok(Err(e)) => {
            tracing::info!(error = %e, "Backend not available, using mock data");
            false
        }
        Err(_) => {
            tracing::info!(timeout_ms = timeout.as_millis() as u64, "Backend health check timed out, using mock data");
            false
        }
    }
}
