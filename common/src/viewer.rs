//! 心電図ビューアの表示状態
//!
//! ズームは誤差を避けるため%の整数で持つ（50-250、20刻み、既定100）。

/// ズーム倍率（%）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ZoomLevel(u16);

impl ZoomLevel {
    pub const MIN: u16 = 50;
    pub const MAX: u16 = 250;
    pub const STEP: u16 = 20;
    pub const DEFAULT: u16 = 100;

    pub fn percent(&self) -> u16 {
        self.0
    }

    /// CSS transform 用の倍率
    pub fn scale(&self) -> f32 {
        f32::from(self.0) / 100.0
    }

    pub fn zoom_in(self) -> Self {
        Self((self.0 + Self::STEP).min(Self::MAX))
    }

    pub fn zoom_out(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP).max(Self::MIN))
    }

    /// 拡大時に画像下へ確保する余白（%）
    pub fn bottom_margin_percent(&self) -> u16 {
        self.0.saturating_sub(100)
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// 特徴オーバーレイのラベル種別（色分け用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Lead,
    PWave,
    Qrs,
    TWave,
}

impl MarkerKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            MarkerKind::Lead => "marker-lead",
            MarkerKind::PWave => "marker-p",
            MarkerKind::Qrs => "marker-qrs",
            MarkerKind::TWave => "marker-t",
        }
    }
}

/// オーバーレイのラベル（位置は画像に対する%）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureMarker {
    pub label: &'static str,
    pub kind: MarkerKind,
    pub top_percent: u8,
    pub left_percent: u8,
}

pub static FEATURE_MARKERS: [FeatureMarker; 7] = [
    FeatureMarker { label: "Lead I", kind: MarkerKind::Lead, top_percent: 27, left_percent: 27 },
    FeatureMarker { label: "aVR", kind: MarkerKind::Lead, top_percent: 27, left_percent: 45 },
    FeatureMarker { label: "V1", kind: MarkerKind::Lead, top_percent: 27, left_percent: 65 },
    FeatureMarker { label: "V4", kind: MarkerKind::Lead, top_percent: 27, left_percent: 85 },
    FeatureMarker { label: "P wave", kind: MarkerKind::PWave, top_percent: 24, left_percent: 10 },
    FeatureMarker { label: "QRS", kind: MarkerKind::Qrs, top_percent: 33, left_percent: 15 },
    FeatureMarker { label: "T wave", kind: MarkerKind::TWave, top_percent: 27, left_percent: 22 },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerState {
    pub zoom: ZoomLevel,
    pub show_features: bool,
}

impl ViewerState {
    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = ZoomLevel::default();
    }

    pub fn toggle_features(&mut self) {
        self.show_features = !self.show_features;
    }

    /// 表示中のオーバーレイ
    pub fn visible_markers(&self) -> &'static [FeatureMarker] {
        if self.show_features {
            &FEATURE_MARKERS
        } else {
            &[]
        }
    }
}
