use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of stylometric features fed to the source attributor.
pub const STYLE_FEATURE_COUNT: usize = 9;

/// Stylometric fingerprint of a text:
/// `[avg_sentence_len, std_sentence_len, polarity, subjectivity, noun, verb, adj, adv, pron]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleFeatures(pub [f64; STYLE_FEATURE_COUNT]);

impl StyleFeatures {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FakeLabel {
    Fake,
    Real,
}

impl fmt::Display for FakeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FakeLabel::Fake => f.write_str("Fake"),
            FakeLabel::Real => f.write_str("Real"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FakePrediction {
    pub label: FakeLabel,
    /// Probability of the "fake" class, rounded to 3 decimals.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePrediction {
    pub predicted_source: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub title: String,
    pub content: String,
    pub claimed_source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub fake_news: FakePrediction,
    pub style_analysis: SourcePrediction,
    pub impersonation_detected: bool,
    pub claimed_source: String,
}

/// Classifies preprocessed article text as fake or genuine.
pub trait FakeNewsClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// `text` is expected to be already cleaned (lowercase, stop words removed).
    fn predict(&self, text: &str) -> FakePrediction;
}

/// Attributes a probable author or outlet from a stylometric fingerprint.
pub trait SourceAttributor: Send + Sync {
    fn name(&self) -> &str;

    fn predict(&self, features: &StyleFeatures) -> SourcePrediction;
}
