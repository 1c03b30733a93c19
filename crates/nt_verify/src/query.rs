use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

/// Upper bound on keywords kept in a query.
pub const MAX_KEYWORDS: usize = 10;
/// Number of raw words used when no keyword survives filtering.
const FALLBACK_WORDS: usize = 8;
const MIN_KEYWORD_LEN: usize = 3;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"https?://\S+").expect("valid url regex");
    static ref PUNCTUATION_RE: Regex = Regex::new(r"[^\w\s'-]").expect("valid punctuation regex");
    static ref STOP_WORDS: HashSet<&'static str> = [
        "the", "a", "an", "is", "are", "was", "were", "be", "been", "being",
        "have", "has", "had", "do", "does", "did", "will", "would", "shall",
        "should", "may", "might", "must", "can", "could", "this", "that",
        "these", "those", "i", "you", "he", "she", "it", "we", "they",
        "me", "him", "her", "us", "them", "my", "your", "his", "its",
        "our", "their", "what", "which", "who", "whom", "where", "when",
        "why", "how", "all", "each", "every", "both", "few", "more",
        "most", "other", "some", "such", "no", "not", "only", "same",
        "so", "than", "too", "very", "just", "about", "above", "after",
        "again", "against", "and", "any", "because", "before", "below",
        "between", "but", "by", "for", "from", "if", "in", "into",
        "of", "on", "or", "out", "over", "then", "to", "under", "up",
        "with", "as", "at", "also", "here", "there", "won", "won't",
        "don", "don't", "doesn", "doesn't", "didn", "didn't", "said", "says",
    ]
    .into_iter()
    .collect();
}

/// Derives a short keyword query from article text.
///
/// URLs and punctuation are dropped, then the first [`MAX_KEYWORDS`] distinct words that are at
/// least three letters long and not stop words are kept in their original case, so proper nouns
/// survive. When nothing survives, the first eight words are used as-is.
pub fn build_query(text: &str) -> String {
    let text = URL_RE.replace_all(text.trim(), "");
    let text = PUNCTUATION_RE.replace_all(&text, " ");
    let words: Vec<&str> = text.split_whitespace().collect();

    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for word in &words {
        let clean = word.trim_matches(|c| c == '\'' || c == '-').to_lowercase();
        if clean.chars().count() < MIN_KEYWORD_LEN || STOP_WORDS.contains(clean.as_str()) {
            continue;
        }
        if !seen.insert(clean) {
            continue;
        }
        keywords.push(*word);
        if keywords.len() >= MAX_KEYWORDS {
            break;
        }
    }

    if keywords.is_empty() {
        return words.iter().take(FALLBACK_WORDS).copied().collect::<Vec<_>>().join(" ");
    }
    keywords.join(" ")
}
