use std::fmt;
use std::path::Path;
use std::sync::Arc;

use nt_core::{
    AnalysisReport, AnalysisRequest, Error, FakeNewsClassifier, Result, SourceAttributor,
};
use tracing::{info, warn};

use crate::impersonation::is_impersonation;
use crate::models::{
    RandomForestAttributor, TfidfLogisticClassifier, FAKE_NEWS_ARTIFACT, SOURCE_ARTIFACT,
};
use crate::preprocess::clean_text;
use crate::style::extract_style_features;

/// Fake-news classification plus style-based source attribution for one article.
#[derive(Clone)]
pub struct Analyzer {
    classifier: Arc<dyn FakeNewsClassifier>,
    attributor: Arc<dyn SourceAttributor>,
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("classifier", &self.classifier.name())
            .field("attributor", &self.attributor.name())
            .finish()
    }
}

impl Analyzer {
    pub fn new(
        classifier: Arc<dyn FakeNewsClassifier>,
        attributor: Arc<dyn SourceAttributor>,
    ) -> Self {
        Self {
            classifier,
            attributor,
        }
    }

    /// Loads both artifacts from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let classifier = TfidfLogisticClassifier::load(&dir.join(FAKE_NEWS_ARTIFACT))?;
        let attributor = RandomForestAttributor::load(&dir.join(SOURCE_ARTIFACT))?;
        info!(
            dir = %dir.display(),
            sources = attributor.classes().len(),
            "loaded analysis models"
        );
        Ok(Self::new(Arc::new(classifier), Arc::new(attributor)))
    }

    /// Like [`Analyzer::load`], but a failure only disables analysis.
    pub fn try_load(dir: &Path) -> Option<Self> {
        match Self::load(dir) {
            Ok(analyzer) => Some(analyzer),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "analysis models unavailable");
                None
            }
        }
    }

    pub fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport> {
        if request.title.trim().is_empty() && request.content.trim().is_empty() {
            return Err(Error::InvalidInput("title and content are both empty".to_string()));
        }

        // headline and body together for the classifier, body alone for style
        let cleaned = clean_text(&format!("{} {}", request.title, request.content));
        let fake_news = self.classifier.predict(&cleaned);
        let style_analysis = self
            .attributor
            .predict(&extract_style_features(&request.content));

        let impersonation_detected = is_impersonation(
            &style_analysis.predicted_source,
            &request.claimed_source,
            style_analysis.confidence,
        );

        Ok(AnalysisReport {
            fake_news,
            style_analysis,
            impersonation_detected,
            claimed_source: request.claimed_source.clone(),
        })
    }
}
