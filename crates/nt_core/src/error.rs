use std::time::Duration;

use thiserror::Error;

use crate::types::ProviderKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Model not loaded: {0}")]
    ModelUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Conditions raised by a single provider. None of them may fail a verification request;
/// the orchestrator logs them and drops the provider from `providers_used`.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} has no credentials configured")]
    Unavailable(ProviderKind),

    #[error("{provider} timed out after {after:?}")]
    Timeout { provider: ProviderKind, after: Duration },

    #[error("{provider} request failed: {source}")]
    Network {
        provider: ProviderKind,
        source: reqwest::Error,
    },

    #[error("{provider} answered with HTTP {status}")]
    Status { provider: ProviderKind, status: u16 },

    #[error("{provider} returned a malformed response: {reason}")]
    Malformed { provider: ProviderKind, reason: String },
}

impl ProviderError {
    pub fn provider(&self) -> ProviderKind {
        match self {
            ProviderError::Unavailable(provider) => *provider,
            ProviderError::Timeout { provider, .. }
            | ProviderError::Network { provider, .. }
            | ProviderError::Status { provider, .. }
            | ProviderError::Malformed { provider, .. } => *provider,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProviderError::Unavailable(_))
    }

    pub fn network(provider: ProviderKind, source: reqwest::Error) -> Self {
        match source.status() {
            Some(status) => ProviderError::Status {
                provider,
                status: status.as_u16(),
            },
            None => ProviderError::Network { provider, source },
        }
    }

    pub fn malformed(provider: ProviderKind, reason: impl Into<String>) -> Self {
        ProviderError::Malformed {
            provider,
            reason: reason.into(),
        }
    }
}
