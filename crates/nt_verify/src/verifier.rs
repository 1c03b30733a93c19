use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use nt_core::{
    Config, Error, Evidence, FactCheckRecord, ProviderError, ProviderKind, Result, SearchProvider,
    SourceRecord, VerificationResult,
};
use nt_providers::{default_providers, Logger};
use tracing::info;

use crate::normalize::{deduplicate_fact_checks, deduplicate_sources};
use crate::outlets::classify;
use crate::query::build_query;
use crate::verdict::assess;

/// Coordinates one verification: query building, provider fan-out, merge, verdict.
pub struct Verifier {
    providers: Vec<Arc<dyn SearchProvider>>,
    timeout: Duration,
    log: Logger,
}

impl Verifier {
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>, timeout: Duration) -> Self {
        Self {
            providers,
            timeout,
            log: Logger::new().with_prefix("[verify]".to_string()),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(default_providers(config)?, config.provider_timeout))
    }

    pub fn providers(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.providers.iter().map(|p| p.kind())
    }

    /// Verifies free article text. Fails only on blank input; every provider problem degrades
    /// into a smaller evidence set.
    pub async fn verify(&self, text: &str) -> Result<VerificationResult> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("content must not be empty".to_string()));
        }

        let query = build_query(text);
        info!(query = %query, chars = text.len(), "built search query");

        let responses = if query.is_empty() {
            self.log.warn("no usable words in content, skipping providers");
            Vec::new()
        } else {
            self.gather(&query).await
        };

        let mut providers_used = Vec::new();
        let mut sources = Vec::new();
        let mut fact_checks = Vec::new();
        for (kind, evidence) in responses {
            if !providers_used.contains(&kind) {
                providers_used.push(kind);
            }
            for item in evidence {
                match item {
                    Evidence::Source(record) => sources.push(record),
                    Evidence::FactCheck(record) => fact_checks.push(record),
                }
            }
        }

        Ok(self.conclude(query, providers_used, sources, fact_checks))
    }

    fn conclude(
        &self,
        query: String,
        providers_used: Vec<ProviderKind>,
        sources: Vec<SourceRecord>,
        fact_checks: Vec<FactCheckRecord>,
    ) -> VerificationResult {
        let collected = sources.len();
        let sources = deduplicate_sources(sources);
        let fact_checks = deduplicate_fact_checks(fact_checks);
        let reputable = classify(&sources);

        info!(
            collected,
            merged = sources.len(),
            reputable = reputable.iter().filter(|r| **r).count(),
            fact_checks = fact_checks.len(),
            "evidence merged"
        );

        let assessment = assess(&fact_checks, &sources, &reputable);
        info!(verdict = %assessment.verdict, confidence = assessment.confidence, "verdict computed");

        VerificationResult::new(query, assessment, providers_used, fact_checks, sources)
    }

    /// Runs every available provider concurrently, each bounded by the timeout. Results come
    /// back in provider order; failed providers are left out.
    async fn gather(&self, query: &str) -> Vec<(ProviderKind, Vec<Evidence>)> {
        let mut kinds = Vec::new();
        let mut handles = Vec::new();

        for provider in &self.providers {
            let kind = provider.kind();
            if !provider.is_available() {
                self.log.info(&format!("{} has no credentials, skipping", kind));
                continue;
            }

            let provider = provider.clone();
            let query = query.to_string();
            let timeout = self.timeout;
            kinds.push(kind);
            handles.push(tokio::spawn(async move {
                match tokio::time::timeout(timeout, provider.search(&query)).await {
                    Ok(result) => result,
                    Err(_) => Err(ProviderError::Timeout {
                        provider: kind,
                        after: timeout,
                    }),
                }
            }));
        }

        let mut responses = Vec::new();
        for (kind, joined) in kinds.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(Ok(evidence)) => {
                    info!(provider = %kind, count = evidence.len(), "provider responded");
                    responses.push((kind, evidence));
                }
                Ok(Err(e)) => self.log.warn(&format!("{} failed, excluding it: {}", kind, e)),
                Err(e) => self.log.warn(&format!("{} task aborted, excluding it: {}", kind, e)),
            }
        }
        responses
    }
}
