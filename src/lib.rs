//! ECG Scan
//!
//! ECG画像の解析（リモート or モック）と解析履歴を扱うCLI本体。

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod scanner;
pub mod server;
pub mod session;
