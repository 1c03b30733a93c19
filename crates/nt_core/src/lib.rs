pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod types;

pub use config::{Config, HumanDuration};
pub use error::{Error, ProviderError, Result};
pub use models::{
    AnalysisReport, AnalysisRequest, FakeLabel, FakeNewsClassifier, FakePrediction, SourceAttributor,
    SourcePrediction, StyleFeatures, STYLE_FEATURE_COUNT,
};
pub use provider::SearchProvider;
pub use types::{
    domain_of, Assessment, Evidence, FactCheckRecord, HeadlineRecord, ProviderKind, Rating,
    SourceRecord, VerificationResult, Verdict,
};

pub mod prelude {
    pub use super::{Error, ProviderError, Result};
    pub use super::{Evidence, FactCheckRecord, ProviderKind, SearchProvider, SourceRecord};
}
