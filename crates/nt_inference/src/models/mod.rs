use std::fs;
use std::path::Path;

use nt_core::{Error, Result};
use serde::de::DeserializeOwned;

pub mod fake_news;
pub mod forest;

pub use fake_news::TfidfLogisticClassifier;
pub use forest::RandomForestAttributor;

/// File name of the fake-news classifier artifact inside the model directory.
pub const FAKE_NEWS_ARTIFACT: &str = "fake_news.json";
/// File name of the source attributor artifact inside the model directory.
pub const SOURCE_ARTIFACT: &str = "source_classifier.json";

/// Reads a JSON model artifact. A missing file is reported as an unloaded model, anything
/// unreadable as a model error.
pub(crate) fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(Error::ModelUnavailable(format!("{} not found", path.display())));
    }
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::Model(format!("{}: {}", path.display(), e)))
}

pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
