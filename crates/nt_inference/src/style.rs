//! Stylometric fingerprinting.
//!
//! The fingerprint is built from sentence length statistics, lexicon sentiment and the share of
//! five word classes. Word classes come from a lightweight rule tagger (closed-class word lists
//! plus suffix rules) rather than a trained part-of-speech model.

use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;
use nt_core::{StyleFeatures, STYLE_FEATURE_COUNT};
use regex::Regex;

lazy_static! {
    static ref SENTENCE_END_RE: Regex = Regex::new(r"[.!?]+(?:\s+|$)|\n{2,}").unwrap();
    static ref WORD_RE: Regex = Regex::new(r"[^\W\d_]+").unwrap();

    static ref PRONOUNS: HashSet<&'static str> = [
        "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself", "yourselves",
        "he", "him", "his", "himself", "she", "her", "hers", "herself", "it", "its", "itself",
        "we", "us", "our", "ours", "ourselves", "they", "them", "their", "theirs", "themselves",
        "who", "whom", "whose", "someone", "anyone", "everyone", "nobody", "something",
        "anything", "everything", "nothing",
    ]
    .into_iter()
    .collect();

    /// Determiners, prepositions, conjunctions, auxiliaries and particles. Never counted.
    static ref FUNCTION_WORDS: HashSet<&'static str> = [
        "a", "an", "the", "this", "that", "these", "those", "some", "any", "each", "every",
        "no", "all", "both", "either", "neither", "of", "in", "on", "at", "by", "for", "with",
        "about", "against", "between", "into", "through", "during", "before", "after", "above",
        "below", "to", "from", "up", "down", "out", "off", "over", "under", "and", "but", "or",
        "nor", "so", "yet", "if", "because", "as", "until", "while", "than", "whether", "is",
        "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do", "does",
        "did", "will", "would", "can", "could", "shall", "should", "may", "might", "must", "not",
        "t", "s",
    ]
    .into_iter()
    .collect();

    static ref ADVERBS: HashSet<&'static str> = [
        "very", "also", "never", "always", "often", "just", "still", "already", "soon", "now",
        "then", "here", "there", "too", "quite", "almost", "again", "ever", "perhaps", "rather",
        "yesterday", "today", "tomorrow", "however", "instead", "only", "even", "once",
    ]
    .into_iter()
    .collect();

    static ref VERBS: HashSet<&'static str> = [
        "say", "says", "said", "make", "makes", "made", "go", "goes", "went", "take", "takes",
        "took", "get", "gets", "got", "know", "knew", "see", "saw", "seen", "come", "came",
        "think", "thought", "give", "gave", "given", "tell", "told", "find", "found", "want",
        "claim", "claims", "show", "shows", "shown", "win", "won", "lose", "lost", "become",
        "became", "leave", "left", "keep", "kept", "hold", "held", "bring", "brought", "begin",
        "began", "run", "ran", "meet", "met", "pay", "paid", "build", "built", "send", "sent",
    ]
    .into_iter()
    .collect();

    static ref ADJECTIVES: HashSet<&'static str> = [
        "new", "good", "great", "old", "big", "high", "small", "large", "long", "young", "bad",
        "true", "false", "real", "fake", "many", "few", "major", "early", "late", "best",
        "worst", "top", "key", "full", "free", "low", "strong", "clear", "whole", "recent",
    ]
    .into_iter()
    .collect();

    /// Word polarity and subjectivity, both in the usual [-1, 1] and [0, 1] ranges.
    static ref SENTIMENT: HashMap<&'static str, (f64, f64)> = [
        ("good", (0.7, 0.6)), ("great", (0.8, 0.75)), ("excellent", (1.0, 1.0)),
        ("best", (1.0, 0.3)), ("happy", (0.8, 1.0)), ("positive", (0.23, 0.55)),
        ("success", (0.3, 0.0)), ("successful", (0.75, 0.95)), ("strong", (0.43, 0.73)),
        ("amazing", (0.6, 0.9)), ("wonderful", (1.0, 1.0)), ("safe", (0.5, 0.5)),
        ("win", (0.8, 0.4)), ("hope", (0.2, 0.5)), ("love", (0.5, 0.6)),
        ("bad", (-0.7, 0.67)), ("worst", (-1.0, 1.0)), ("terrible", (-1.0, 1.0)),
        ("horrible", (-1.0, 1.0)), ("awful", (-1.0, 1.0)), ("sad", (-0.5, 1.0)),
        ("negative", (-0.3, 0.4)), ("wrong", (-0.5, 0.9)), ("false", (-0.4, 0.6)),
        ("fake", (-0.5, 1.0)), ("shocking", (-1.0, 1.0)), ("dangerous", (-0.6, 0.9)),
        ("crisis", (-0.3, 0.4)), ("angry", (-0.5, 1.0)), ("fear", (-0.4, 0.6)),
        ("true", (0.35, 0.65)), ("real", (0.2, 0.3)), ("important", (0.4, 1.0)),
        ("serious", (-0.33, 0.67)), ("official", (0.0, 0.0)), ("unbelievable", (-0.5, 0.9)),
        ("incredible", (0.9, 0.9)), ("outrageous", (-0.8, 1.0)), ("secret", (-0.4, 0.7)),
    ]
    .into_iter()
    .collect();

    static ref NEGATIONS: HashSet<&'static str> =
        ["not", "no", "never", "t"].into_iter().collect();
}

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "ical", "less", "ish", "ic"];
const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordClass {
    Noun,
    Verb,
    Adj,
    Adv,
    Pron,
    Other,
}

fn tag(word: &str, previous: Option<&str>) -> WordClass {
    if PRONOUNS.contains(word) {
        return WordClass::Pron;
    }
    if FUNCTION_WORDS.contains(word) {
        return WordClass::Other;
    }
    if ADVERBS.contains(word) || (word.len() > 4 && word.ends_with("ly")) {
        return WordClass::Adv;
    }
    let adjective_suffix = ADJECTIVE_SUFFIXES
        .iter()
        .any(|s| word.len() > s.len() + 2 && word.ends_with(s));
    if ADJECTIVES.contains(word) || adjective_suffix {
        return WordClass::Adj;
    }
    let after_subject = previous.map_or(false, |p| PRONOUNS.contains(p) || p == "to");
    if VERBS.contains(word)
        || after_subject
        || (word.len() > 4 && (word.ends_with("ed") || word.ends_with("ing")))
    {
        return WordClass::Verb;
    }
    WordClass::Noun
}

fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_END_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn words(sentence: &str) -> Vec<String> {
    WORD_RE
        .find_iter(sentence)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Mean polarity and subjectivity of the lexicon words present, with a negation immediately
/// before a word scaling its polarity by -0.5.
pub fn sentiment(words: &[String]) -> (f64, f64) {
    let mut polarity = Vec::new();
    let mut subjectivity = Vec::new();

    for (i, word) in words.iter().enumerate() {
        if let Some(&(p, s)) = SENTIMENT.get(word.as_str()) {
            let negated = i > 0 && NEGATIONS.contains(words[i - 1].as_str());
            polarity.push(if negated { p * NEGATION_FACTOR } else { p });
            subjectivity.push(s);
        }
    }

    if polarity.is_empty() {
        return (0.0, 0.0);
    }
    let n = polarity.len() as f64;
    (
        (polarity.iter().sum::<f64>() / n).clamp(-1.0, 1.0),
        (subjectivity.iter().sum::<f64>() / n).clamp(0.0, 1.0),
    )
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Extracts the 9-value fingerprint. Text without any sentence or word yields all zeros.
pub fn extract_style_features(text: &str) -> StyleFeatures {
    let tokenized: Vec<Vec<String>> = sentences(text).into_iter().map(words).collect();
    let all_words: Vec<String> = tokenized.iter().flatten().cloned().collect();

    if tokenized.is_empty() || all_words.is_empty() {
        return StyleFeatures::default();
    }

    let lengths: Vec<f64> = tokenized.iter().map(|s| s.len() as f64).collect();
    let (avg_len, std_len) = mean_and_std(&lengths);
    let (polarity, subjectivity) = sentiment(&all_words);

    let mut counts = [0usize; 5];
    for sentence in &tokenized {
        let mut previous: Option<&str> = None;
        for word in sentence {
            let slot = match tag(word, previous) {
                WordClass::Noun => Some(0),
                WordClass::Verb => Some(1),
                WordClass::Adj => Some(2),
                WordClass::Adv => Some(3),
                WordClass::Pron => Some(4),
                WordClass::Other => None,
            };
            if let Some(slot) = slot {
                counts[slot] += 1;
            }
            previous = Some(word.as_str());
        }
    }

    let total = all_words.len() as f64;
    let mut features = [0.0; STYLE_FEATURE_COUNT];
    features[0] = avg_len;
    features[1] = std_len;
    features[2] = polarity;
    features[3] = subjectivity;
    for (i, count) in counts.iter().enumerate() {
        features[4 + i] = *count as f64 / total;
    }
    StyleFeatures(features)
}
