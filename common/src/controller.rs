//! 画面状態コントローラ（CLI/WASM共通）
//!
//! Idle → ImageSelected → Analyzing → ResultReady → (reset) → Idle
//!
//! 解析の開始は画像選択時の遷移ガードで1回だけ発火する。
//! 解析にはチケットを発行し、現在のチケットと一致しない完了通知は破棄する
//! （解析中に画像が外された・差し替えられた場合の古い結果）。

use crate::error::Error;
use crate::types::{AnalysisResult, HistoryEntry};

/// 選択中の画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveImage {
    pub name: String,
    /// プレビュー参照（data URL / object URL / ファイルパス）
    pub preview: String,
    /// 心電図レポート形式らしいか（ビューア表示の切替に使う）
    pub likely_ecg_report: bool,
}

impl ActiveImage {
    pub fn new(name: impl Into<String>, preview: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preview: preview.into(),
            likely_ecg_report: false,
        }
    }

    pub fn with_ecg_report(mut self, likely: bool) -> Self {
        self.likely_ecg_report = likely;
        self
    }
}

/// 解析1回分の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnalysisTicket(u64);

impl AnalysisTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// 結果の出所
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSource {
    Analysis,
    History { entry_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    ImageSelected {
        image: ActiveImage,
    },
    Analyzing {
        image: ActiveImage,
        ticket: AnalysisTicket,
    },
    ResultReady {
        image: ActiveImage,
        result: AnalysisResult,
        source: ResultSource,
    },
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::ImageSelected { .. } => "image-selected",
            Phase::Analyzing { .. } => "analyzing",
            Phase::ResultReady { .. } => "result-ready",
        }
    }
}

/// タブ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Analysis,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Destructive,
}

/// 一時通知（トースト）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.to_string(),
            description: description.into(),
        }
    }

    fn destructive(title: &str, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Destructive,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisController {
    phase: Phase,
    tab: Tab,
    next_ticket: u64,
    notices: Vec<Notice>,
}

impl Default for AnalysisController {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            tab: Tab::Analysis,
            next_ticket: 1,
            notices: Vec::new(),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, Phase::Analyzing { .. })
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            Phase::ResultReady { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ActiveImage> {
        match &self.phase {
            Phase::Idle => None,
            Phase::ImageSelected { image }
            | Phase::Analyzing { image, .. }
            | Phase::ResultReady { image, .. } => Some(image),
        }
    }

    /// 画像を選択し、そのまま解析を開始する
    ///
    /// 解析中に別の画像が選ばれた場合は新しいチケットを発行し、
    /// 以前の解析結果は到着しても破棄される。
    pub fn select_image(&mut self, image: ActiveImage) -> AnalysisTicket {
        self.notices.push(Notice::info(
            "Image uploaded",
            "Your ECG image has been uploaded successfully.",
        ));
        self.start(image)
    }

    /// ImageSelected → Analyzing の遷移ガード
    ///
    /// 画像選択済みで結果も解析中チケットもないときだけ発火する。
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        let image = match &self.phase {
            Phase::ImageSelected { image } => image.clone(),
            _ => return None,
        };

        Some(self.start(image))
    }

    fn start(&mut self, image: ActiveImage) -> AnalysisTicket {
        let ticket = AnalysisTicket(self.next_ticket);
        self.next_ticket += 1;
        self.phase = Phase::Analyzing { image, ticket };
        ticket
    }

    /// 画像以外のファイルを拒否（状態は変えない）
    pub fn reject_upload(&mut self, error: &Error) {
        self.notices.push(Notice::destructive(
            "Please upload an image file",
            error.to_string(),
        ));
    }

    /// 解析完了。チケットが現在のものと一致したときだけ反映する
    pub fn complete_analysis(&mut self, ticket: AnalysisTicket, result: AnalysisResult) -> bool {
        let image = match &self.phase {
            Phase::Analyzing { image, ticket: current } if *current == ticket => image.clone(),
            _ => return false,
        };

        self.notices.push(Notice::info(
            "Analysis complete",
            format!(
                "Detected: {} with {}% confidence.",
                result.prediction, result.confidence
            ),
        ));
        self.phase = Phase::ResultReady {
            image,
            result,
            source: ResultSource::Analysis,
        };
        true
    }

    /// 解析失敗。画像選択状態に戻して再試行可能にする
    pub fn fail_analysis(&mut self, ticket: AnalysisTicket, reason: &str) -> bool {
        let image = match &self.phase {
            Phase::Analyzing { image, ticket: current } if *current == ticket => image.clone(),
            _ => return false,
        };

        self.notices.push(Notice::destructive(
            "Analysis failed",
            format!(
                "There was an error analyzing your ECG image. Please try again. ({})",
                reason
            ),
        ));
        self.phase = Phase::ImageSelected { image };
        true
    }

    /// 失敗後の再試行
    pub fn retry(&mut self) -> Option<AnalysisTicket> {
        self.begin_analysis()
    }

    /// 「Analyze Another Image」/ 画像の取り外し
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// 履歴エントリを選択して結果表示へ（解析は行わない）
    pub fn select_history(&mut self, entry: &HistoryEntry) {
        self.phase = Phase::ResultReady {
            image: ActiveImage::new(entry.prediction.clone(), entry.thumbnail_url.clone()),
            result: AnalysisResult::from_history(entry),
            source: ResultSource::History {
                entry_id: entry.id.clone(),
            },
        };
        self.tab = Tab::Analysis;
    }

    /// 溜まった通知を取り出す
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::mock_history;
    use crate::types::RiskLevel;

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            prediction: "Atrial Fibrillation".to_string(),
            confidence: 86,
            risk: RiskLevel::Medium,
            details: vec!["Irregular RR intervals".to_string()],
            ecg_type: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let controller = AnalysisController::new();
        assert_eq!(controller.phase(), &Phase::Idle);
        assert_eq!(controller.tab(), Tab::Analysis);
        assert!(controller.result().is_none());
    }

    #[test]
    fn test_select_image_starts_analysis() {
        let mut controller = AnalysisController::new();
        let ticket = controller.select_image(ActiveImage::new("ecg.png", "blob:1"));

        assert!(controller.is_analyzing());
        assert_eq!(controller.image().unwrap().name, "ecg.png");

        let notices = controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "Image uploaded");

        assert!(controller.complete_analysis(ticket, sample_result()));
        assert_eq!(controller.phase().name(), "result-ready");
        assert_eq!(controller.result().unwrap().confidence, 86);
    }

    #[test]
    fn test_begin_analysis_guard() {
        let mut controller = AnalysisController::new();
        assert!(controller.begin_analysis().is_none());

        let ticket = controller.select_image(ActiveImage::new("a.png", "a"));
        // 解析中は重複発火しない
        assert!(controller.begin_analysis().is_none());

        controller.complete_analysis(ticket, sample_result());
        // 結果表示中も発火しない
        assert!(controller.begin_analysis().is_none());
    }

    #[test]
    fn test_stale_result_after_reset_is_discarded() {
        let mut controller = AnalysisController::new();
        let ticket = controller.select_image(ActiveImage::new("a.png", "a"));

        controller.reset();
        assert!(!controller.complete_analysis(ticket, sample_result()));
        assert_eq!(controller.phase(), &Phase::Idle);
    }

    #[test]
    fn test_stale_result_after_new_image_is_discarded() {
        let mut controller = AnalysisController::new();
        let first = controller.select_image(ActiveImage::new("a.png", "a"));
        let second = controller.select_image(ActiveImage::new("b.png", "b"));
        assert_ne!(first, second);

        assert!(!controller.complete_analysis(first, sample_result()));
        assert!(controller.is_analyzing());

        assert!(controller.complete_analysis(second, sample_result()));
        assert_eq!(controller.image().unwrap().name, "b.png");
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut controller = AnalysisController::new();
        let ticket = controller.select_image(ActiveImage::new("a.png", "a"));
        controller.take_notices();

        assert!(controller.fail_analysis(ticket, "boom"));
        assert_eq!(controller.phase().name(), "image-selected");

        let notices = controller.take_notices();
        assert_eq!(notices[0].kind, NoticeKind::Destructive);
        assert_eq!(notices[0].title, "Analysis failed");

        let retry = controller.retry().expect("再試行できない");
        assert_ne!(retry, ticket);
        // 古いチケットの失敗は無視
        assert!(!controller.fail_analysis(ticket, "late"));
        assert!(controller.is_analyzing());
    }

    #[test]
    fn test_reject_upload_keeps_state() {
        let mut controller = AnalysisController::new();
        let ticket = controller.select_image(ActiveImage::new("a.png", "a"));
        controller.complete_analysis(ticket, sample_result());
        let before = controller.phase().clone();
        controller.take_notices();

        controller.reject_upload(&Error::NotAnImage("notes.txt".to_string()));

        assert_eq!(controller.phase(), &before);
        let notices = controller.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Destructive);
        assert!(notices[0].description.contains("notes.txt"));
    }

    #[test]
    fn test_select_history_entry() {
        let mut controller = AnalysisController::new();
        controller.set_tab(Tab::History);

        let entry = &mock_history()[1];
        controller.select_history(entry);

        let result = controller.result().expect("結果がない");
        assert_eq!(result.prediction, entry.prediction);
        assert_eq!(result.confidence, entry.confidence);
        assert_eq!(result.risk, entry.risk);
        assert_eq!(controller.tab(), Tab::Analysis);
        assert_eq!(controller.image().unwrap().preview, entry.thumbnail_url);

        match controller.phase() {
            Phase::ResultReady { source, .. } => assert_eq!(
                source,
                &ResultSource::History {
                    entry_id: entry.id.clone()
                }
            ),
            other => panic!("unexpected phase: {:?}", other),
        }
    }

    #[test]
    fn test_reset_from_result() {
        let mut controller = AnalysisController::new();
        let ticket = controller.select_image(ActiveImage::new("a.png", "a"));
        controller.complete_analysis(ticket, sample_result());

        controller.reset();
        assert_eq!(controller.phase(), &Phase::Idle);
        assert!(controller.image().is_none());
    }
}
