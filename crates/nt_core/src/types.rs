use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    NewsSearch,
    FactCheck,
    WebSearch,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::NewsSearch => "news_search",
            ProviderKind::FactCheck => "fact_check",
            ProviderKind::WebSearch => "web_search",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host part of a URL, lowercased. Empty when the URL does not parse or has no host.
pub fn domain_of(url: &str) -> String {
    Url::parse(url.trim())
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
        .unwrap_or_default()
}

/// One candidate article or page returned by a search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub domain: String,
    pub provider: ProviderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

impl SourceRecord {
    pub fn new(
        provider: ProviderKind,
        title: impl Into<String>,
        url: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        let title = title.into().trim().to_string();
        let url = url.into().trim().to_string();
        let domain = domain_of(&url);
        Self {
            title,
            url,
            snippet: snippet.into().trim().to_string(),
            domain,
            provider,
            published_at: None,
            source_name: None,
        }
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        let published_at = published_at.into();
        self.published_at = (!published_at.is_empty()).then_some(published_at);
        self
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        let source_name = source_name.into();
        self.source_name = (!source_name.is_empty()).then_some(source_name);
        self
    }

    /// Overrides the domain for records whose URL is absent but whose outlet is known.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into().to_lowercase();
        self
    }
}

/// Normalized fact-check verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rating {
    True,
    False,
    Mixed,
    Unrated,
}

const FALSE_MARKERS: &[&str] = &[
    "false",
    "fake",
    "pants on fire",
    "incorrect",
    "misleading",
    "not true",
    "untrue",
    "hoax",
    "fabricated",
    "satire",
    "scam",
    "wrong",
];

const MIXED_MARKERS: &[&str] = &[
    "mixed",
    "mixture",
    "half",
    "partly",
    "partially",
    "unsupported",
    "exaggerat",
];

const TRUE_MARKERS: &[&str] = &["true", "correct", "accurate", "verified", "confirmed", "real"];

impl Rating {
    /// Maps a publisher's free-form rating onto the closed set.
    ///
    /// Markers are matched as case-insensitive substrings. FALSE markers are checked first, so
    /// "Mostly False" and "Not true" never land on TRUE; MIXED is checked before TRUE so that
    /// "Half true" stays mixed.
    pub fn from_textual(raw: &str) -> Rating {
        let raw = raw.to_lowercase();
        let contains_any = |markers: &[&str]| markers.iter().any(|m| raw.contains(m));

        if contains_any(FALSE_MARKERS) {
            Rating::False
        } else if contains_any(MIXED_MARKERS) {
            Rating::Mixed
        } else if contains_any(TRUE_MARKERS) {
            Rating::True
        } else {
            Rating::Unrated
        }
    }
}

/// A third-party assessment of a claim, as published by a fact-checking outlet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckRecord {
    pub claim_text: String,
    pub rating: Rating,
    /// The publisher's own wording, kept for display.
    pub textual_rating: String,
    pub publisher: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl FactCheckRecord {
    pub fn new(
        claim_text: impl Into<String>,
        textual_rating: impl Into<String>,
        publisher: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let textual_rating = textual_rating.into();
        Self {
            claim_text: claim_text.into(),
            rating: Rating::from_textual(&textual_rating),
            textual_rating,
            publisher: publisher.into(),
            url: url.into(),
            claimant: None,
            title: None,
        }
    }

    pub fn with_claimant(mut self, claimant: impl Into<String>) -> Self {
        let claimant = claimant.into();
        self.claimant = (!claimant.is_empty()).then_some(claimant);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.is_empty()).then_some(title);
        self
    }
}

/// What a provider hands back: either a corroborating source or a fact-check.
#[derive(Debug, Clone, PartialEq)]
pub enum Evidence {
    Source(SourceRecord),
    FactCheck(FactCheckRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Real,
    Fake,
    Unverified,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Real => f.write_str("REAL"),
            Verdict::Fake => f.write_str("FAKE"),
            Verdict::Unverified => f.write_str("UNVERIFIED"),
        }
    }
}

/// Output of the verdict engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub verdict: Verdict,
    pub confidence: f64,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub query_used: String,
    pub verdict: Verdict,
    pub confidence: f64,
    pub explanation: String,
    pub providers_used: Vec<ProviderKind>,
    pub fact_checks: Vec<FactCheckRecord>,
    pub sources: Vec<SourceRecord>,
    pub sources_found: usize,
}

impl VerificationResult {
    pub fn new(
        query_used: String,
        assessment: Assessment,
        providers_used: Vec<ProviderKind>,
        fact_checks: Vec<FactCheckRecord>,
        sources: Vec<SourceRecord>,
    ) -> Self {
        Self {
            query_used,
            verdict: assessment.verdict,
            confidence: assessment.confidence.clamp(0.0, 1.0),
            explanation: assessment.explanation,
            providers_used,
            fact_checks,
            sources_found: sources.len(),
            sources,
        }
    }
}

/// One trending headline for a category of the ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineRecord {
    pub headline: String,
    pub category: String,
    pub url: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_ago: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://WWW.Reuters.com/world/x"), "www.reuters.com");
        assert_eq!(domain_of("not a url"), "");
        assert_eq!(domain_of(""), "");
    }

    #[test]
    fn test_source_record_derives_domain() {
        let record = SourceRecord::new(
            ProviderKind::NewsSearch,
            " Title ",
            "https://news.bbc.co.uk/story",
            "snippet",
        )
        .with_source_name("BBC")
        .with_published_at("");
        assert_eq!(record.title, "Title");
        assert_eq!(record.domain, "news.bbc.co.uk");
        assert_eq!(record.source_name.as_deref(), Some("BBC"));
        assert!(record.published_at.is_none());
    }

    #[test]
    fn test_rating_from_textual() {
        assert_eq!(Rating::from_textual("False"), Rating::False);
        assert_eq!(Rating::from_textual("Mostly False"), Rating::False);
        assert_eq!(Rating::from_textual("Pants on Fire!"), Rating::False);
        assert_eq!(Rating::from_textual("Not true"), Rating::False);
        assert_eq!(Rating::from_textual("Untrue"), Rating::False);
        assert_eq!(Rating::from_textual("Misleading"), Rating::False);
        assert_eq!(Rating::from_textual("Half True"), Rating::Mixed);
        assert_eq!(Rating::from_textual("Mixture"), Rating::Mixed);
        assert_eq!(Rating::from_textual("TRUE"), Rating::True);
        assert_eq!(Rating::from_textual("Mostly true"), Rating::True);
        assert_eq!(Rating::from_textual("Correct"), Rating::True);
        assert_eq!(Rating::from_textual("Needs context"), Rating::Unrated);
        assert_eq!(Rating::from_textual(""), Rating::Unrated);
    }

    #[test]
    fn test_verification_result_counts_sources() {
        let sources = vec![
            SourceRecord::new(ProviderKind::WebSearch, "a", "https://a.com/1", ""),
            SourceRecord::new(ProviderKind::WebSearch, "b", "https://b.com/1", ""),
        ];
        let result = VerificationResult::new(
            "query".to_string(),
            Assessment {
                verdict: Verdict::Unverified,
                confidence: 1.7,
                explanation: String::new(),
            },
            vec![ProviderKind::WebSearch],
            vec![],
            sources,
        );
        assert_eq!(result.sources_found, 2);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_wire_format() {
        let record = FactCheckRecord::new("claim", "Pants on fire", "PolitiFact", "https://politifact.com/x");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["rating"], "FALSE");
        assert_eq!(json["textual_rating"], "Pants on fire");
        assert!(json.get("claimant").is_none());

        assert_eq!(serde_json::to_value(Verdict::Unverified).unwrap(), "UNVERIFIED");
        assert_eq!(serde_json::to_value(ProviderKind::FactCheck).unwrap(), "fact_check");
    }
}
