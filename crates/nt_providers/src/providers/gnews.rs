use std::time::Duration;

use async_trait::async_trait;
use nt_core::{Evidence, ProviderError, ProviderKind, SearchProvider, SourceRecord};
use reqwest::Client;
use serde::Deserialize;

use super::utils;
use crate::logging::Logger;

pub const GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";
const SEARCH_MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
pub(crate) struct GNewsResponse {
    #[serde(default)]
    articles: Vec<serde_json::Value>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

impl GNewsResponse {
    /// Articles that decode; the others are logged and skipped.
    pub(crate) fn into_articles(self, log: &Logger) -> Vec<GNewsArticle> {
        self.articles
            .into_iter()
            .filter_map(|item| utils::decode_item(item, "article", log))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GNewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<GNewsSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GNewsSource {
    #[serde(default)]
    pub name: Option<String>,
}

impl GNewsArticle {
    pub fn source_name(&self) -> Option<String> {
        utils::non_empty(self.source.as_ref().and_then(|s| s.name.clone()))
    }

    fn into_source_record(self) -> Option<SourceRecord> {
        let source_name = self.source_name();
        let title = utils::non_empty(self.title);
        let url = utils::non_empty(self.url);
        if title.is_none() && url.is_none() {
            return None;
        }
        Some(
            SourceRecord::new(
                ProviderKind::NewsSearch,
                title.unwrap_or_default(),
                url.unwrap_or_default(),
                self.description.unwrap_or_default(),
            )
            .with_published_at(self.published_at.unwrap_or_default())
            .with_source_name(source_name.unwrap_or_default()),
        )
    }
}

/// News search over the GNews API. Needs `GNEWS_API_KEY`.
pub struct GNewsProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    log: Logger,
}

impl GNewsProvider {
    pub fn new(api_key: Option<String>, timeout: Duration) -> nt_core::Result<Self> {
        Ok(Self {
            client: utils::http_client(timeout)?,
            api_key: utils::non_empty(api_key),
            base_url: GNEWS_BASE_URL.to_string(),
            log: Logger::new().with_prefix("[gnews]".to_string()),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::Unavailable(ProviderKind::NewsSearch))
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<GNewsResponse, ProviderError> {
        let api_key = self.api_key()?;
        let provider = ProviderKind::NewsSearch;

        let body = self
            .client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(params)
            .query(&[("lang", "en"), ("apikey", api_key)])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ProviderError::network(provider, e))?
            .text()
            .await
            .map_err(|e| ProviderError::network(provider, e))?;

        parse_response(&body)
    }

    /// Top headline(s) of a GNews category, used by the headline feed.
    pub async fn top_headlines(&self, category: &str, max: usize) -> Result<Vec<GNewsArticle>, ProviderError> {
        let max = max.to_string();
        let response = self
            .get("top-headlines", &[("category", category), ("max", max.as_str())])
            .await?;
        Ok(response.into_articles(&self.log))
    }
}

pub(crate) fn parse_response(body: &str) -> Result<GNewsResponse, ProviderError> {
    let response: GNewsResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::malformed(ProviderKind::NewsSearch, e.to_string()))?;

    let has_errors = match &response.errors {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Array(errors)) => !errors.is_empty(),
        Some(serde_json::Value::Object(errors)) => !errors.is_empty(),
        Some(serde_json::Value::String(error)) => !error.is_empty(),
        Some(_) => true,
    };
    if has_errors {
        let errors = response.errors.map(|e| e.to_string()).unwrap_or_default();
        return Err(ProviderError::malformed(ProviderKind::NewsSearch, errors));
    }
    Ok(response)
}

pub(crate) fn into_evidence(response: GNewsResponse, log: &Logger) -> Vec<Evidence> {
    response
        .into_articles(log)
        .into_iter()
        .filter_map(GNewsArticle::into_source_record)
        .map(Evidence::Source)
        .collect()
}

#[async_trait]
impl SearchProvider for GNewsProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::NewsSearch
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search(&self, query: &str) -> Result<Vec<Evidence>, ProviderError> {
        self.log.info(&format!("request: q={}", query));
        let max = SEARCH_MAX_RESULTS.to_string();
        let response = self.get("search", &[("q", query), ("max", max.as_str())]).await?;
        let evidence = into_evidence(response, &self.log);
        self.log.info(&format!("returned {} results", evidence.len()));
        Ok(evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "totalArticles": 3,
        "articles": [
            {
                "title": "Flood waters recede in the valley",
                "description": "Residents return home.",
                "url": "https://www.reuters.com/world/flood-waters-recede",
                "image": "https://cdn.reuters.com/img.jpg",
                "publishedAt": "2024-05-01T10:00:00Z",
                "source": { "name": "Reuters", "url": "https://www.reuters.com" }
            },
            { "description": "no title and no url" },
            {
                "title": "Valley flood update",
                "url": "https://apnews.com/article/valley-flood",
                "source": {}
            }
        ]
    }"#;

    #[test]
    fn test_parse_search_response() {
        let evidence = into_evidence(parse_response(SEARCH_BODY).unwrap(), &Logger::new());
        assert_eq!(evidence.len(), 2);

        let Evidence::Source(first) = &evidence[0] else {
            panic!("expected a source record");
        };
        assert_eq!(first.title, "Flood waters recede in the valley");
        assert_eq!(first.snippet, "Residents return home.");
        assert_eq!(first.domain, "www.reuters.com");
        assert_eq!(first.provider, ProviderKind::NewsSearch);
        assert_eq!(first.source_name.as_deref(), Some("Reuters"));
        assert_eq!(first.published_at.as_deref(), Some("2024-05-01T10:00:00Z"));

        let Evidence::Source(second) = &evidence[1] else {
            panic!("expected a source record");
        };
        assert_eq!(second.domain, "apnews.com");
        assert!(second.source_name.is_none());
    }

    #[test]
    fn test_errors_field_is_reported() {
        let err = parse_response(r#"{"errors": ["You did not provide an API key."]}"#).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed { provider: ProviderKind::NewsSearch, .. }));

        assert!(parse_response(r#"{"articles": [], "errors": []}"#).is_ok());
        assert!(parse_response("<html>").is_err());
    }

    #[test]
    fn test_bad_article_does_not_hide_good_ones() {
        let body = r#"{
            "articles": [
                { "title": "Wrong shape", "url": "https://example.org/x", "source": "Reuters" },
                { "title": "Valid story", "url": "https://www.reuters.com/valid" },
                42
            ]
        }"#;
        let evidence = into_evidence(parse_response(body).unwrap(), &Logger::new());
        assert_eq!(evidence.len(), 1);
        let Evidence::Source(record) = &evidence[0] else {
            panic!("expected a source record");
        };
        assert_eq!(record.title, "Valid story");
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let provider = GNewsProvider::new(Some("  ".to_string()), Duration::from_secs(1)).unwrap();
        assert!(!provider.is_available());
        let err = provider.search("flood").await.unwrap_err();
        assert!(err.is_unavailable());
    }
}
