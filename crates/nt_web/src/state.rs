use std::sync::Arc;

use nt_core::{Config, Result};
use nt_inference::Analyzer;
use nt_providers::HeadlineFeed;
use nt_verify::Verifier;

pub struct AppState {
    pub verifier: Arc<Verifier>,
    /// `None` when the model artifacts could not be loaded.
    pub analyzer: Option<Arc<Analyzer>>,
    pub headlines: Arc<HeadlineFeed>,
}

impl AppState {
    pub fn new(verifier: Verifier, analyzer: Option<Analyzer>, headlines: HeadlineFeed) -> Self {
        Self {
            verifier: Arc::new(verifier),
            analyzer: analyzer.map(Arc::new),
            headlines: Arc::new(headlines),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            Verifier::from_config(config)?,
            Analyzer::try_load(&config.model_dir),
            HeadlineFeed::from_config(config)?,
        ))
    }
}
