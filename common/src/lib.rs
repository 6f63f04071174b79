//! ECG Scan Common Library
//!
//! CLIとWeb(WASM)で共有される型・カタログ・モック生成・画面状態

pub mod types;
pub mod catalog;
pub mod synth;
pub mod controller;
pub mod viewer;
pub mod intake;
pub mod error;

pub use types::{AnalysisResult, EcgTypeInfo, HistoryEntry, RiskLevel, SaveHistoryRequest, parse_timestamp};
pub use catalog::{ConditionRecord, condition_by_name};
pub use synth::{MockBaseline, local_history_entry, mock_history, synthesize_result};
pub use controller::{ActiveImage, AnalysisController, AnalysisTicket, Notice, NoticeKind, Phase, ResultSource, Tab};
pub use viewer::{FeatureMarker, ViewerState, ZoomLevel};
pub use intake::{UploadCheck, validate_upload};
pub use error::{Error, Result};
