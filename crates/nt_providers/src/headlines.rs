use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use nt_core::{Config, HeadlineRecord, SearchProvider};
use tokio::sync::RwLock;

use crate::logging::Logger;
use crate::providers::gnews::{GNewsArticle, GNewsProvider};

/// GNews category and the label shown in the ticker.
pub const CATEGORIES: [(&str, &str); 5] = [
    ("politics", "POLITICS"),
    ("technology", "TECH"),
    ("business", "BUSINESS"),
    ("entertainment", "ENTERTAINMENT"),
    ("world", "WORLD"),
];

/// (label, headline, source) served when a category cannot be fetched.
const FALLBACK_HEADLINES: [(&str, &str, &str); 5] = [
    ("POLITICS", "Global Leaders Discuss New Trade Agreements", "World Affairs Daily"),
    ("TECH", "AI Breakthrough Enables Faster Drug Discovery", "Tech Review"),
    ("BUSINESS", "Stock Markets Rally on Strong Earnings Reports", "Finance Today"),
    ("ENTERTAINMENT", "Award-Winning Film Director Announces New Project", "Entertainment Wire"),
    ("WORLD", "UN Launches Initiative for Climate Resilience", "Global News"),
];

pub fn fallback_headline(label: &str) -> Option<HeadlineRecord> {
    FALLBACK_HEADLINES
        .iter()
        .find(|(l, _, _)| *l == label)
        .map(|(label, headline, source)| HeadlineRecord {
            headline: headline.to_string(),
            category: label.to_string(),
            url: String::new(),
            source: source.to_string(),
            published_at: None,
            time_ago: String::new(),
            image: None,
        })
}

/// Renders the age of a headline: `12 min ago`, `1 hour ago`, `3 days ago`.
pub fn time_ago(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(published_at) = published_at else {
        return String::new();
    };
    let minutes = (now - published_at).num_minutes().max(0);
    if minutes < 60 {
        return format!("{} min ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" });
    }
    let days = hours / 24;
    format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
}

fn headline_from_article(article: GNewsArticle, label: &str) -> Option<HeadlineRecord> {
    let source = article.source_name().unwrap_or_default();
    let headline = article.title.filter(|t| !t.trim().is_empty())?;
    let published_at = article
        .published_at
        .as_deref()
        .and_then(|p| DateTime::parse_from_rfc3339(p).ok())
        .map(|p| p.with_timezone(&Utc));

    Some(HeadlineRecord {
        headline: headline.trim().to_string(),
        category: label.to_string(),
        url: article.url.unwrap_or_default(),
        source,
        published_at,
        time_ago: String::new(),
        image: article.image.filter(|i| !i.is_empty()),
    })
}

#[derive(Debug, Clone)]
struct CachedHeadline {
    record: HeadlineRecord,
    fetched_at: Instant,
}

impl CachedHeadline {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// One headline per category, each cached and refreshed on its own.
pub struct HeadlineFeed {
    gnews: Option<Arc<GNewsProvider>>,
    ttl: Duration,
    cache: RwLock<HashMap<&'static str, CachedHeadline>>,
    log: Logger,
}

impl HeadlineFeed {
    pub fn new(gnews: Option<Arc<GNewsProvider>>, ttl: Duration) -> Self {
        Self {
            gnews: gnews.filter(|g| g.is_available()),
            ttl,
            cache: RwLock::new(HashMap::new()),
            log: Logger::new().with_prefix("[headlines]".to_string()),
        }
    }

    pub fn from_config(config: &Config) -> nt_core::Result<Self> {
        let gnews = GNewsProvider::new(config.gnews_api_key.clone(), config.provider_timeout)?;
        Ok(Self::new(Some(Arc::new(gnews)), config.headlines_ttl))
    }

    pub async fn headlines(&self) -> Vec<HeadlineRecord> {
        let mut records = match &self.gnews {
            None => {
                self.log.info("no GNews API key, using fallback headlines");
                CATEGORIES
                    .iter()
                    .filter_map(|(_, label)| fallback_headline(label))
                    .collect()
            }
            Some(gnews) => {
                let fetches = CATEGORIES
                    .iter()
                    .map(|&(category, label)| self.category_headline(gnews, category, label));
                join_all(fetches).await.into_iter().flatten().collect::<Vec<_>>()
            }
        };

        let now = Utc::now();
        for record in &mut records {
            record.time_ago = time_ago(record.published_at, now);
        }
        records
    }

    async fn category_headline(
        &self,
        gnews: &GNewsProvider,
        category: &'static str,
        label: &str,
    ) -> Option<HeadlineRecord> {
        if let Some(cached) = self.cache.read().await.get(category) {
            if cached.is_fresh(self.ttl, Instant::now()) {
                return Some(cached.record.clone());
            }
        }

        let fetched = match gnews.top_headlines(category, 1).await {
            Ok(articles) => articles
                .into_iter()
                .next()
                .and_then(|article| headline_from_article(article, label)),
            Err(e) => {
                self.log.warn(&format!("headline fetch failed for {}: {}", category, e));
                None
            }
        };

        match fetched {
            Some(record) => {
                self.cache.write().await.insert(
                    category,
                    CachedHeadline {
                        record: record.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                Some(record)
            }
            None => fallback_headline(label),
        }
    }
}
