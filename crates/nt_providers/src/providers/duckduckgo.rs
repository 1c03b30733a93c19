use std::time::Duration;

use async_trait::async_trait;
use nt_core::{Evidence, ProviderError, ProviderKind, SearchProvider, SourceRecord};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::utils;
use crate::logging::Logger;

pub const DUCKDUCKGO_BASE_URL: &str = "https://html.duckduckgo.com";
const MAX_RESULTS: usize = 8;

/// General web search through the DuckDuckGo HTML endpoint. Needs no credential and is the
/// fallback that is always attempted.
pub struct DuckDuckGoProvider {
    client: Client,
    base_url: String,
    max_results: usize,
    log: Logger,
}

impl DuckDuckGoProvider {
    pub fn new(timeout: Duration) -> nt_core::Result<Self> {
        Ok(Self {
            client: utils::http_client(timeout)?,
            base_url: DUCKDUCKGO_BASE_URL.to_string(),
            max_results: MAX_RESULTS,
            log: Logger::new().with_prefix("[duckduckgo]".to_string()),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

fn selector(css: &str) -> Result<Selector, ProviderError> {
    Selector::parse(css).map_err(|e| {
        ProviderError::malformed(ProviderKind::WebSearch, format!("invalid selector {}: {:?}", css, e))
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    utils::collapse_whitespace(&element.text().collect::<String>())
}

/// Result links go through a `/l/?uddg=<target>` redirect; return the target instead.
fn resolve_result_url(href: &str) -> String {
    let href = href.trim();
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href.to_string()
    };

    match Url::parse(&absolute) {
        Ok(url) if url.path().starts_with("/l/") => url
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, target)| target.into_owned())
            .unwrap_or(absolute),
        _ => absolute,
    }
}

fn parse_results(html: &str, max_results: usize) -> Result<Vec<Evidence>, ProviderError> {
    let document = Html::parse_document(html);
    let result_selector = selector("div.result")?;
    let title_selector = selector("a.result__a")?;
    let snippet_selector = selector(".result__snippet")?;

    let mut records = Vec::new();
    for result in document.select(&result_selector) {
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }
        let Some(anchor) = result.select(&title_selector).next() else {
            continue;
        };

        let title = element_text(anchor);
        let url = anchor
            .value()
            .attr("href")
            .map(resolve_result_url)
            .unwrap_or_default();
        if title.is_empty() && url.is_empty() {
            continue;
        }
        let snippet = result
            .select(&snippet_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        records.push(Evidence::Source(SourceRecord::new(
            ProviderKind::WebSearch,
            title,
            url,
            snippet,
        )));
        if records.len() >= max_results {
            break;
        }
    }
    Ok(records)
}

#[async_trait]
impl SearchProvider for DuckDuckGoProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::WebSearch
    }

    async fn search(&self, query: &str) -> Result<Vec<Evidence>, ProviderError> {
        let provider = ProviderKind::WebSearch;

        self.log.info(&format!("request: q={}", query));
        let html = self
            .client
            .get(format!("{}/html/", self.base_url))
            .query(&[("q", query)])
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| ProviderError::network(provider, e))?
            .text()
            .await
            .map_err(|e| ProviderError::network(provider, e))?;

        let records = parse_results(&html, self.max_results)?;
        self.log.info(&format!("returned {} results", records.len()));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_HTML: &str = r##"
        <html><body>
        <div class="results">
          <div class="result results_links result--ad">
            <a class="result__a" href="https://ads.example.com/buy">Sponsored</a>
            <a class="result__snippet">Buy now</a>
          </div>
          <div class="result results_links results_links_deep web-result">
            <h2 class="result__title">
              <a rel="nofollow" class="result__a"
                 href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.bbc.com%2Fnews%2Fworld-123&amp;rut=abc">
                 Storm hits the <b>coast</b>
              </a>
            </h2>
            <a class="result__snippet" href="#">The storm made landfall
               on Tuesday.</a>
          </div>
          <div class="result results_links web-result">
            <a class="result__a" href="https://apnews.com/article/storm">AP: Storm coverage</a>
          </div>
          <div class="result results_links web-result">
            <span>no anchor here</span>
          </div>
        </div>
        </body></html>
    "##;

    fn sources(html: &str, max: usize) -> Vec<SourceRecord> {
        parse_results(html, max)
            .unwrap()
            .into_iter()
            .filter_map(|e| match e {
                Evidence::Source(s) => Some(s),
                Evidence::FactCheck(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_parse_results_skips_ads_and_unwraps_redirects() {
        let records = sources(RESULTS_HTML, MAX_RESULTS);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].title, "Storm hits the coast");
        assert_eq!(records[0].url, "https://www.bbc.com/news/world-123");
        assert_eq!(records[0].domain, "www.bbc.com");
        assert_eq!(records[0].snippet, "The storm made landfall on Tuesday.");
        assert_eq!(records[0].provider, ProviderKind::WebSearch);

        assert_eq!(records[1].url, "https://apnews.com/article/storm");
        assert_eq!(records[1].snippet, "");
    }

    #[test]
    fn test_parse_results_honours_limit() {
        assert_eq!(sources(RESULTS_HTML, 1).len(), 1);
        assert!(sources("<html><body>No results.</body></html>", MAX_RESULTS).is_empty());
    }

    #[test]
    fn test_resolve_result_url() {
        assert_eq!(
            resolve_result_url("/l/?uddg=https%3A%2F%2Fexample.org%2Fa%3Fb%3D1"),
            "https://example.org/a?b=1"
        );
        assert_eq!(
            resolve_result_url("https://example.org/plain"),
            "https://example.org/plain"
        );
        assert_eq!(resolve_result_url("//duckduckgo.com/l/?x=1"), "https://duckduckgo.com/l/?x=1");
    }
}
