use crate::error::{EcgScanError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// バックエンドURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "ECG_SCAN_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// 解析画像の送信形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UploadEncoding {
    /// multipart/form-data（フィールド名 `image`）
    #[default]
    Multipart,
    /// JSON `{ "image_data": <data URL> }`
    Base64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub probe_timeout_ms: u64,
    /// 疎通確認後の解析・履歴リクエストの上限
    pub request_timeout_ms: u64,
    pub mock_delay_ms: u64,
    pub encoding: UploadEncoding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            probe_timeout_ms: 2000,
            request_timeout_ms: 30_000,
            // 「解析中」表示が見えるようにモック結果を遅らせる
            mock_delay_ms: 1500,
            encoding: UploadEncoding::Multipart,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        // 環境変数を優先
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| EcgScanError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ecg-scan").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EcgScanError::Config(format!(
                "base_urlはhttp(s)で始まる必要があります: {}",
                self.base_url
            )));
        }
        if self.probe_timeout_ms == 0 {
            return Err(EcgScanError::Config("probe_timeout_msは1以上".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(EcgScanError::Config("request_timeout_msは1以上".into()));
        }
        Ok(())
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        self.base_url = url;
        self.validate()?;
        self.save()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.probe_timeout(), Duration::from_secs(2));
        assert_eq!(config.mock_delay(), Duration::from_millis(1500));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.encoding, UploadEncoding::Multipart);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"encoding": "base64"}"#).unwrap();
        assert_eq!(config.encoding, UploadEncoding::Base64);
        assert_eq!(config.probe_timeout_ms, 2000);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = Config {
            base_url: "localhost:5000".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EcgScanError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = Config {
            probe_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            request_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
