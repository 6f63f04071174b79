//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use ecg_scan::error::EcgScanError;
use ecg_scan::scanner;
use std::path::Path;
use tempfile::tempdir;

/// 存在しないパスをスキャンした場合
#[test]
fn test_scan_nonexistent_path() {
    let result = scanner::scan_path(Path::new("/nonexistent/path/12345"));
    assert!(matches!(result, Err(EcgScanError::FileNotFound(_))));
}

/// 画像のないフォルダは空のVec
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = scanner::scan_path(dir.path());
    assert!(result.unwrap().is_empty());
}

/// EcgScanErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        EcgScanError::Config("テスト設定エラー".to_string()),
        EcgScanError::FileNotFound("test.png".to_string()),
        EcgScanError::NoImagesFound("フォルダ".to_string()),
        EcgScanError::ImageLoad("読み込み失敗".to_string()),
        EcgScanError::Server("500 Internal Server Error: boom".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

#[test]
fn test_server_error_message() {
    let err = EcgScanError::Server("400 Bad Request: No valid image provided".to_string());
    assert_eq!(
        format!("{}", err),
        "サーバエラー: 400 Bad Request: No valid image provided"
    );
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: EcgScanError = io_err.into();

    assert!(matches!(err, EcgScanError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: EcgScanError = json_err.into();

    assert!(matches!(err, EcgScanError::JsonParse(_)));
}

/// common::Errorは透過的にそのまま表示される
#[test]
fn test_common_error_transparent() {
    let common_err = ecg_scan_common::Error::NotAnImage("notes.txt".to_string());
    let err: EcgScanError = common_err.into();

    assert!(matches!(err, EcgScanError::Common(_)));
    assert_eq!(format!("{}", err), "Not an image file: notes.txt");
}
