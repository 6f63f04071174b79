//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not an image file: {0}")]
    NotAnImage(String),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_not_an_image() {
        let error = Error::NotAnImage("report.pdf".to_string());
        assert_eq!(format!("{}", error), "Not an image file: report.pdf");
    }

    #[test]
    fn test_error_display_invalid_data_url() {
        let error = Error::InvalidDataUrl("data:image/png,raw".to_string());
        assert_eq!(format!("{}", error), "Invalid data URL: data:image/png,raw");
    }

    #[test]
    fn test_error_debug() {
        let error = Error::InvalidDataUrl("テスト".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("InvalidDataUrl"));
        assert!(debug.contains("テスト"));
    }
}
