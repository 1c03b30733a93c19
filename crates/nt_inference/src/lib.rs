pub mod analyzer;
pub mod impersonation;
pub mod models;
pub mod preprocess;
pub mod style;

pub use analyzer::Analyzer;
pub use impersonation::{is_impersonation, IMPERSONATION_THRESHOLD};
pub use models::{RandomForestAttributor, TfidfLogisticClassifier};
pub use preprocess::clean_text;
pub use style::extract_style_features;

pub mod prelude {
    pub use super::Analyzer;
    pub use nt_core::{AnalysisReport, AnalysisRequest, Error, Result};
}
