use std::collections::HashSet;

use nt_core::{FactCheckRecord, SourceRecord};
use url::Url;

/// Canonical form of a URL used for duplicate detection: lowercase host without `www.`,
/// followed by the lowercase path without trailing slash. Scheme, query string and fragment
/// are ignored. Returns `None` for a blank URL.
pub fn normalize_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let normalized = match Url::parse(raw) {
        Ok(url) if url.host_str().is_some() => {
            let host = url.host_str().unwrap_or_default().to_lowercase();
            let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
            format!("{}{}", host, url.path().trim_end_matches('/').to_lowercase())
        }
        _ => {
            let base = raw.split(['?', '#']).next().unwrap_or(raw).to_lowercase();
            let base = base.strip_prefix("www.").unwrap_or(&base);
            base.trim_end_matches('/').to_string()
        }
    };
    Some(normalized)
}

fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Identity of a source record: its normalized URL, or its normalized title within its domain
/// when the URL is missing.
pub fn dedup_key(record: &SourceRecord) -> String {
    match normalize_url(&record.url) {
        Some(url) => format!("url:{}", url),
        None => format!(
            "title:{}|{}",
            record.domain.to_lowercase(),
            normalize_text(&record.title)
        ),
    }
}

/// Stable de-duplication: the first occurrence of each record wins and relative order is kept.
pub fn deduplicate_sources(records: Vec<SourceRecord>) -> Vec<SourceRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(dedup_key(record)))
        .collect()
}

/// Same review surfaced twice collapses to one record. Reviews are told apart by URL, claim,
/// publisher and rating, so URL-less reviews from different fact-checkers never merge.
pub fn deduplicate_fact_checks(records: Vec<FactCheckRecord>) -> Vec<FactCheckRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            seen.insert((
                normalize_url(&record.url).unwrap_or_default(),
                normalize_text(&record.claim_text),
                normalize_text(&record.publisher),
                record.rating,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::ProviderKind;

    fn source(provider: ProviderKind, title: &str, url: &str) -> SourceRecord {
        SourceRecord::new(provider, title, url, "")
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://WWW.Reuters.com/World/Story/?utm_source=x#top").as_deref(),
            Some("reuters.com/world/story")
        );
        assert_eq!(
            normalize_url("http://reuters.com/world/story").as_deref(),
            Some("reuters.com/world/story")
        );
        assert_eq!(normalize_url("https://bbc.com/").as_deref(), Some("bbc.com"));
        assert_eq!(normalize_url("  ").as_deref(), None);
        assert_eq!(
            normalize_url("bbc.com/News/?page=2").as_deref(),
            Some("bbc.com/news")
        );
    }

    #[test]
    fn test_schemeless_url_matches_parsed_form() {
        assert_eq!(normalize_url("WWW.bbc.com/x/"), normalize_url("https://bbc.com/x"));
        assert_eq!(normalize_url("www.bbc.com/x").as_deref(), Some("bbc.com/x"));
    }

    #[test]
    fn test_deduplicate_url_variants() {
        let records = vec![
            source(ProviderKind::NewsSearch, "Storm hits", "https://www.bbc.com/news/storm?at=1"),
            source(ProviderKind::WebSearch, "Other", "https://other.org/a"),
            source(ProviderKind::WebSearch, "Storm hits (dup)", "HTTPS://BBC.COM/News/Storm/"),
        ];
        let unique = deduplicate_sources(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].title, "Storm hits");
        assert_eq!(unique[0].provider, ProviderKind::NewsSearch);
        assert_eq!(unique[1].title, "Other");
    }

    #[test]
    fn test_deduplicate_without_url_uses_title_within_domain() {
        let records = vec![
            source(ProviderKind::NewsSearch, "Storm  Hits", "").with_domain("bbc.com"),
            source(ProviderKind::WebSearch, "storm hits", "").with_domain("bbc.com"),
            source(ProviderKind::WebSearch, "storm hits", "").with_domain("cnn.com"),
        ];
        let unique = deduplicate_sources(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].domain, "bbc.com");
        assert_eq!(unique[1].domain, "cnn.com");
    }

    #[test]
    fn test_deduplicate_is_idempotent() {
        let records = vec![
            source(ProviderKind::NewsSearch, "a", "https://a.com/1"),
            source(ProviderKind::WebSearch, "a", "https://a.com/1/"),
            source(ProviderKind::WebSearch, "b", "https://b.com/2"),
            source(ProviderKind::WebSearch, "c", ""),
        ];
        let once = deduplicate_sources(records);
        let twice = deduplicate_sources(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_deduplicate_fact_checks() {
        let records = vec![
            FactCheckRecord::new("Claim A", "False", "PolitiFact", "https://politifact.com/a"),
            FactCheckRecord::new("claim  a", "False", "PolitiFact", "https://www.politifact.com/a/"),
            FactCheckRecord::new("Claim A", "True", "Snopes", "https://snopes.com/a"),
        ];
        let unique = deduplicate_fact_checks(records);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[1].publisher, "Snopes");
    }

    #[test]
    fn test_urlless_fact_checks_from_different_publishers_are_kept() {
        let records = vec![
            FactCheckRecord::new("", "True", "Snopes", ""),
            FactCheckRecord::new("", "False", "PolitiFact", ""),
            FactCheckRecord::new("", "False", "PolitiFact", ""),
        ];
        let unique = deduplicate_fact_checks(records);
        assert_eq!(unique.len(), 2);

        let assessment = crate::verdict::assess(&unique, &[], &[]);
        assert_eq!(assessment.verdict, nt_core::Verdict::Fake);
    }
}
