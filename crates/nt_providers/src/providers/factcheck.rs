use std::time::Duration;

use async_trait::async_trait;
use nt_core::{domain_of, Evidence, FactCheckRecord, ProviderError, ProviderKind, SearchProvider};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::utils;
use crate::logging::Logger;

pub const FACTCHECK_BASE_URL: &str = "https://factchecktools.googleapis.com";
const PAGE_SIZE: &str = "10";

#[derive(Debug, Deserialize)]
struct ClaimSearchResponse {
    #[serde(default)]
    claims: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Claim {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    claimant: Option<String>,
    #[serde(default, rename = "claimReview")]
    claim_review: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ClaimReview {
    #[serde(default)]
    publisher: Option<Publisher>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "textualRating")]
    textual_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Publisher {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    site: Option<String>,
}

/// Claim search over the Google Fact Check Tools API. Needs `GOOGLE_FACTCHECK_API_KEY`.
pub struct FactCheckProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    log: Logger,
}

impl FactCheckProvider {
    pub fn new(api_key: Option<String>, timeout: Duration) -> nt_core::Result<Self> {
        Ok(Self {
            client: utils::http_client(timeout)?,
            api_key: utils::non_empty(api_key),
            base_url: FACTCHECK_BASE_URL.to_string(),
            log: Logger::new().with_prefix("[factcheck]".to_string()),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

/// Flattens claims into one record per review. Reviews carrying neither a URL nor a rating
/// say nothing usable and are dropped, as are claims or reviews that do not decode.
fn parse_claims(body: &str, log: &Logger) -> Result<Vec<Evidence>, ProviderError> {
    let response: ClaimSearchResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::malformed(ProviderKind::FactCheck, e.to_string()))?;

    let mut records = Vec::new();
    for claim in response.claims {
        let Some(claim) = utils::decode_item::<Claim>(claim, "claim", log) else {
            continue;
        };
        let claim_text = utils::non_empty(claim.text).unwrap_or_default();
        let claimant = utils::non_empty(claim.claimant).unwrap_or_default();

        for review in claim.claim_review {
            let Some(review) = utils::decode_item::<ClaimReview>(review, "review", log) else {
                continue;
            };
            let url = utils::non_empty(review.url).unwrap_or_default();
            let textual_rating = utils::non_empty(review.textual_rating).unwrap_or_default();
            if url.is_empty() && textual_rating.is_empty() {
                continue;
            }

            let publisher = review
                .publisher
                .and_then(|p| utils::non_empty(p.name).or_else(|| utils::non_empty(p.site)))
                .unwrap_or_else(|| domain_of(&url));
            let title = utils::non_empty(review.title).unwrap_or_default();

            records.push(Evidence::FactCheck(
                FactCheckRecord::new(claim_text.clone(), textual_rating, publisher, url)
                    .with_claimant(claimant.clone())
                    .with_title(title),
            ));
        }
    }
    Ok(records)
}

#[async_trait]
impl SearchProvider for FactCheckProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::FactCheck
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str) -> Result<Vec<Evidence>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::Unavailable(ProviderKind::FactCheck))?;
        let provider = ProviderKind::FactCheck;

        self.log.info(&format!("request: query={}", query));
        let body = self
            .client
            .get(format!("{}/v1alpha1/claims:search", self.base_url))
            .query(&[
                ("query", query),
                ("key", api_key),
                ("languageCode", "en"),
                ("pageSize", PAGE_SIZE),
            ])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ProviderError::network(provider, e))?
            .text()
            .await
            .map_err(|e| ProviderError::network(provider, e))?;

        let records = parse_claims(&body, &self.log)?;
        self.log.info(&format!("returned {} results", records.len()));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::Rating;

    const CLAIMS_BODY: &str = r#"{
        "claims": [
            {
                "text": "Drinking hot water cures the flu",
                "claimant": "Social media posts",
                "claimDate": "2024-01-10T00:00:00Z",
                "claimReview": [
                    {
                        "publisher": { "name": "PolitiFact", "site": "politifact.com" },
                        "url": "https://www.politifact.com/factchecks/hot-water",
                        "title": "No, hot water does not cure the flu",
                        "textualRating": "Pants on Fire",
                        "languageCode": "en"
                    },
                    {
                        "publisher": { "site": "fullfact.org" },
                        "url": "https://fullfact.org/health/hot-water",
                        "textualRating": "Mostly false"
                    },
                    { "publisher": { "name": "Empty Review" } }
                ]
            },
            {
                "text": "The bridge reopened on Monday",
                "claimReview": [
                    {
                        "url": "https://www.snopes.com/fact-check/bridge",
                        "textualRating": "True"
                    }
                ]
            },
            { "text": "claim without reviews" }
        ]
    }"#;

    fn records(body: &str) -> Vec<FactCheckRecord> {
        parse_claims(body, &Logger::new())
            .unwrap()
            .into_iter()
            .filter_map(|e| match e {
                Evidence::FactCheck(record) => Some(record),
                Evidence::Source(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_claims_flattens_reviews() {
        let records = records(CLAIMS_BODY);
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].claim_text, "Drinking hot water cures the flu");
        assert_eq!(records[0].publisher, "PolitiFact");
        assert_eq!(records[0].rating, Rating::False);
        assert_eq!(records[0].textual_rating, "Pants on Fire");
        assert_eq!(records[0].claimant.as_deref(), Some("Social media posts"));
        assert_eq!(
            records[0].title.as_deref(),
            Some("No, hot water does not cure the flu")
        );

        assert_eq!(records[1].publisher, "fullfact.org");
        assert_eq!(records[1].rating, Rating::False);

        assert_eq!(records[2].publisher, "www.snopes.com");
        assert_eq!(records[2].rating, Rating::True);
        assert!(records[2].claimant.is_none());
    }

    #[test]
    fn test_empty_and_malformed_bodies() {
        assert!(records("{}").is_empty());
        let err = parse_claims("not json", &Logger::new()).unwrap_err();
        assert_eq!(err.provider(), ProviderKind::FactCheck);
    }

    #[test]
    fn test_bad_review_does_not_hide_good_ones() {
        let body = r#"{
            "claims": [
                {
                    "text": "The moon is made of cheese",
                    "claimReview": [
                        {
                            "publisher": { "name": "PolitiFact" },
                            "url": "https://www.politifact.com/moon",
                            "textualRating": "False"
                        },
                        { "url": "https://example.org/odd", "textualRating": 3 }
                    ]
                },
                { "text": ["not", "a", "string"] },
                {
                    "text": "Water is wet",
                    "claimReview": [{ "url": "https://snopes.com/wet", "textualRating": "True" }]
                }
            ]
        }"#;
        let records = records(body);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].publisher, "PolitiFact");
        assert_eq!(records[0].rating, Rating::False);
        assert_eq!(records[1].claim_text, "Water is wet");
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let provider = FactCheckProvider::new(None, Duration::from_secs(1)).unwrap();
        assert!(!provider.is_available());
        assert!(provider.search("anything").await.unwrap_err().is_unavailable());
    }
}
