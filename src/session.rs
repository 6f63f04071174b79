//! 解析セッション
//!
//! 画面状態コントローラと解析サービスをつなぐ。
//! 受付チェック → 画像選択（解析チケット発行）→ 解析 → 結果反映 → 履歴保存。
//! 想定外の失敗はここで捕捉し、通知を出して再試行可能な状態に戻す。

use crate::analyzer::{AnalysisService, ImageUpload};
use crate::scanner::ImageFile;
use ecg_scan_common::{
    validate_upload, ActiveImage, AnalysisController, AnalysisResult, HistoryEntry, Notice,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// 1画像分の処理結果
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub file_name: String,
    pub result: Option<AnalysisResult>,
    pub saved: Option<HistoryEntry>,
    pub notices: Vec<Notice>,
}

pub struct AnalysisSession<'a> {
    service: &'a AnalysisService,
    controller: AnalysisController,
    save: bool,
    show_progress: bool,
}

impl<'a> AnalysisSession<'a> {
    pub fn new(service: &'a AnalysisService) -> Self {
        Self {
            service,
            controller: AnalysisController::new(),
            save: true,
            show_progress: false,
        }
    }

    /// 解析結果を履歴に保存するか
    pub fn with_save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    /// 解析中スピナーを表示するか
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn controller(&self) -> &AnalysisController {
        &self.controller
    }

    pub async fn run(&mut self, file: &ImageFile) -> SessionOutcome {
        let mut outcome = SessionOutcome {
            file_name: file.file_name.clone(),
            result: None,
            saved: None,
            notices: Vec::new(),
        };

        let check = match validate_upload(&file.file_name, &file.mime, file.size) {
            Ok(check) => check,
            Err(e) => {
                self.controller.reject_upload(&e);
                outcome.notices = self.controller.take_notices();
                return outcome;
            }
        };
        if check.oversized {
            tracing::warn!(file = %file.file_name, size = file.size, "Image exceeds the recommended 5MB");
        }

        let image_ref = thumbnail_ref(file);
        let ticket = self.controller.select_image(
            ActiveImage::new(file.file_name.clone(), image_ref.clone())
                .with_ecg_report(check.likely_ecg_report),
        );

        let upload = match ImageUpload::from_file(file) {
            Ok(upload) => upload,
            Err(e) => {
                tracing::error!(error = %e, "Analysis error");
                self.controller.fail_analysis(ticket, &e.to_string());
                self.controller.reset();
                outcome.notices = self.controller.take_notices();
                return outcome;
            }
        };

        let spinner = self.show_progress.then(|| analyzing_spinner(&file.file_name));
        let result = self.service.analyze(&upload).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        if !self.controller.complete_analysis(ticket, result.clone()) {
            tracing::debug!(ticket = ticket.id(), "Discarding stale analysis result");
            outcome.notices = self.controller.take_notices();
            return outcome;
        }

        if self.save {
            outcome.saved = Some(self.service.save_result(&result, &image_ref).await);
        }

        outcome.result = Some(result);
        outcome.notices = self.controller.take_notices();
        // 次の画像に備えて結果表示を閉じる
        self.controller.reset();
        outcome
    }
}

/// 履歴のサムネイル参照（絶対パス）
fn thumbnail_ref(file: &ImageFile) -> String {
    file.path
        .canonicalize()
        .unwrap_or_else(|_| file.path.clone())
        .display()
        .to_string()
}

fn analyzing_spinner(file_name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("Analyzing ECG image: {}", file_name));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
