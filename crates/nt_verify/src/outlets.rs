use std::collections::HashSet;

use lazy_static::lazy_static;
use nt_core::SourceRecord;

lazy_static! {
    /// Outlets presumed to have editorial standards. Read-only for the life of the process.
    pub static ref REPUTABLE_OUTLETS: HashSet<&'static str> = [
        "reuters.com", "apnews.com", "bbc.com", "bbc.co.uk",
        "nytimes.com", "washingtonpost.com", "theguardian.com",
        "cnn.com", "aljazeera.com", "npr.org", "pbs.org",
        "abcnews.go.com", "cbsnews.com", "nbcnews.com",
        "usatoday.com", "bloomberg.com", "economist.com",
        "forbes.com", "time.com", "thehindu.com", "ndtv.com",
        "hindustantimes.com", "indianexpress.com",
        "snopes.com", "factcheck.org", "politifact.com",
        "fullfact.org", "boomlive.in", "altnews.in",
    ]
    .into_iter()
    .collect();
}

/// True when `domain` is a listed outlet or a subdomain of one (`news.bbc.co.uk` matches
/// `bbc.co.uk`). Lookalikes such as `notbbc.com` do not match.
pub fn is_reputable(domain: &str) -> bool {
    let domain = domain.trim().trim_end_matches('.').to_lowercase();
    if domain.is_empty() {
        return false;
    }

    let mut candidate = domain.as_str();
    loop {
        if REPUTABLE_OUTLETS.contains(candidate) {
            return true;
        }
        match candidate.split_once('.') {
            Some((_, parent)) if parent.contains('.') => candidate = parent,
            _ => return false,
        }
    }
}

/// Reputable flag for each source, in order.
pub fn classify(sources: &[SourceRecord]) -> Vec<bool> {
    sources.iter().map(|s| is_reputable(&s.domain)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::ProviderKind;

    #[test]
    fn test_exact_and_subdomain_matches() {
        assert!(is_reputable("reuters.com"));
        assert!(is_reputable("www.reuters.com"));
        assert!(is_reputable("news.bbc.co.uk"));
        assert!(is_reputable("WWW.APNEWS.COM."));
        assert!(is_reputable("abcnews.go.com"));
    }

    #[test]
    fn test_non_matches() {
        assert!(!is_reputable(""));
        assert!(!is_reputable("notbbc.com"));
        assert!(!is_reputable("bbc.com.evil.net"));
        assert!(!is_reputable("go.com"));
        assert!(!is_reputable("co.uk"));
        assert!(!is_reputable("example.org"));
    }

    #[test]
    fn test_classify_preserves_order() {
        let sources = vec![
            SourceRecord::new(ProviderKind::WebSearch, "a", "https://www.reuters.com/a", ""),
            SourceRecord::new(ProviderKind::WebSearch, "b", "https://blog.example.org/b", ""),
            SourceRecord::new(ProviderKind::NewsSearch, "c", "https://edition.cnn.com/c", ""),
        ];
        assert_eq!(classify(&sources), vec![true, false, true]);
    }
}
