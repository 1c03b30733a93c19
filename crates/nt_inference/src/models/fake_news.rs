use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use lazy_static::lazy_static;
use nt_core::{Error, FakeLabel, FakeNewsClassifier, FakePrediction, Result};
use regex::Regex;
use serde::Deserialize;

use super::{read_artifact, round3};

lazy_static! {
    /// Tokens of two or more word characters, as the vectorizer was trained with.
    static ref TOKEN_RE: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Deserialize)]
pub struct FakeNewsArtifact {
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// TF-IDF vectorizer followed by logistic regression. Immutable once loaded.
pub struct TfidfLogisticClassifier {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    coef: Vec<f64>,
    intercept: f64,
}

impl fmt::Debug for TfidfLogisticClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TfidfLogisticClassifier")
            .field("vocabulary", &self.vocabulary.len())
            .field("intercept", &self.intercept)
            .finish()
    }
}

impl TfidfLogisticClassifier {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_artifact(read_artifact(path)?)
    }

    pub fn from_artifact(artifact: FakeNewsArtifact) -> Result<Self> {
        let dims = artifact.idf.len();
        if dims == 0 {
            return Err(Error::Model("fake-news model has an empty feature space".to_string()));
        }
        if artifact.coef.len() != dims {
            return Err(Error::Model(format!(
                "fake-news model has {} idf weights but {} coefficients",
                dims,
                artifact.coef.len()
            )));
        }
        if let Some((term, index)) = artifact.vocabulary.iter().find(|(_, i)| **i >= dims) {
            return Err(Error::Model(format!(
                "vocabulary term '{}' points at feature {} of {}",
                term, index, dims
            )));
        }

        Ok(Self {
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            coef: artifact.coef,
            intercept: artifact.intercept,
        })
    }

    /// L2-normalized tf-idf vector, sparse as `(feature, weight)` pairs.
    fn vectorize(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in TOKEN_RE.find_iter(&text.to_lowercase()) {
            if let Some(&index) = self.vocabulary.get(token.as_str()) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();
        let norm = weighted.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm == 0.0 {
            return weighted;
        }
        weighted.into_iter().map(|(i, w)| (i, w / norm)).collect()
    }

    /// Probability that `text` is fake.
    pub fn probability(&self, text: &str) -> f64 {
        let z = self.intercept
            + self
                .vectorize(text)
                .iter()
                .map(|(index, weight)| self.coef[*index] * weight)
                .sum::<f64>();
        1.0 / (1.0 + (-z).exp())
    }
}

impl FakeNewsClassifier for TfidfLogisticClassifier {
    fn name(&self) -> &str {
        "tfidf-logistic"
    }

    fn predict(&self, text: &str) -> FakePrediction {
        let p = self.probability(text);
        FakePrediction {
            label: if p > DECISION_THRESHOLD { FakeLabel::Fake } else { FakeLabel::Real },
            confidence: round3(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> FakeNewsArtifact {
        FakeNewsArtifact {
            vocabulary: [("miracle", 0), ("cure", 1), ("senate", 2)]
                .into_iter()
                .map(|(t, i)| (t.to_string(), i))
                .collect(),
            idf: vec![2.0, 1.5, 1.0],
            coef: vec![4.0, 2.0, -4.0],
            intercept: 0.0,
        }
    }

    #[test]
    fn test_unknown_words_fall_back_to_intercept() {
        let model = TfidfLogisticClassifier::from_artifact(artifact()).unwrap();
        assert_eq!(model.probability("nothing known here"), 0.5);
        assert_eq!(model.predict("").label, FakeLabel::Real);
        assert_eq!(model.predict("").confidence, 0.5);
    }

    #[test]
    fn test_prediction_direction() {
        let model = TfidfLogisticClassifier::from_artifact(artifact()).unwrap();
        let fake = model.predict("miracle cure discovered");
        assert_eq!(fake.label, FakeLabel::Fake);
        assert!(fake.confidence > 0.9);

        let real = model.predict("senate votes");
        assert_eq!(real.label, FakeLabel::Real);
        assert_eq!(real.confidence, round3(1.0 / (1.0 + 4f64.exp())));
    }

    #[test]
    fn test_vector_is_unit_length() {
        let model = TfidfLogisticClassifier::from_artifact(artifact()).unwrap();
        let vector = model.vectorize("miracle miracle cure senate");
        let norm: f64 = vector.iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_inconsistent_artifacts_are_rejected() {
        let mut bad = artifact();
        bad.coef.pop();
        assert!(matches!(TfidfLogisticClassifier::from_artifact(bad), Err(Error::Model(_))));

        let mut bad = artifact();
        bad.vocabulary.insert("overflow".to_string(), 7);
        assert!(matches!(TfidfLogisticClassifier::from_artifact(bad), Err(Error::Model(_))));
    }
}
