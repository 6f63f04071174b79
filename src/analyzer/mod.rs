pub mod probe;
mod service;

pub use probe::{probe_backend, DEFAULT_PROBE_TIMEOUT};
pub use service::{AnalysisService, ImageUpload};
