//! Turns collected evidence into a verdict.
//!
//! Rules are evaluated top to bottom and the first match wins:
//!
//! 1. any fact-check rated FALSE → FAKE
//! 2. any fact-check rated TRUE → REAL
//! 3. at least [`MIN_REPUTABLE_SOURCES`] reputable outlets → REAL
//! 4. some sources → UNVERIFIED at [`PARTIAL_EVIDENCE_CONFIDENCE`]
//! 5. nothing → UNVERIFIED at [`NO_EVIDENCE_CONFIDENCE`]
//!
//! Fact-check evidence always outranks outlet counts, and FALSE outranks TRUE.

use std::collections::HashSet;

use nt_core::{Assessment, FactCheckRecord, Rating, SourceRecord, Verdict};

pub const MIN_REPUTABLE_SOURCES: usize = 3;

const FACT_CHECK_BASE: f64 = 0.80;
const FACT_CHECK_STEP: f64 = 0.05;
const FACT_CHECK_CAP: f64 = 0.95;

const REPUTABLE_BASE: f64 = 0.50;
const REPUTABLE_STEP: f64 = 0.07;
const REPUTABLE_CAP: f64 = 0.90;

pub const PARTIAL_EVIDENCE_CONFIDENCE: f64 = 0.25;
pub const NO_EVIDENCE_CONFIDENCE: f64 = 0.0;

/// How many publishers are named in an explanation.
const NAMED_PUBLISHERS: usize = 3;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 0.85 for one matching fact-check, +0.05 for each further one, capped at 0.95.
pub fn fact_check_confidence(matching: usize) -> f64 {
    round2((FACT_CHECK_BASE + FACT_CHECK_STEP * matching as f64).min(FACT_CHECK_CAP))
}

/// 0.71 at three reputable outlets, +0.07 per further outlet, capped at 0.90.
pub fn reputable_confidence(reputable: usize) -> f64 {
    round2((REPUTABLE_BASE + REPUTABLE_STEP * reputable as f64).min(REPUTABLE_CAP))
}

fn publishers(records: &[&FactCheckRecord]) -> String {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| if r.publisher.is_empty() { "?" } else { r.publisher.as_str() })
        .filter(|p| seen.insert(*p))
        .take(NAMED_PUBLISHERS)
        .collect::<Vec<_>>()
        .join(", ")
}

fn with_rating(fact_checks: &[FactCheckRecord], rating: Rating) -> Vec<&FactCheckRecord> {
    fact_checks.iter().filter(|f| f.rating == rating).collect()
}

/// Applies the priority rule. `reputable[i]` tells whether `sources[i]` comes from a reputable
/// outlet.
pub fn assess(fact_checks: &[FactCheckRecord], sources: &[SourceRecord], reputable: &[bool]) -> Assessment {
    let rated_false = with_rating(fact_checks, Rating::False);
    let rated_true = with_rating(fact_checks, Rating::True);

    if !rated_false.is_empty() {
        let mut explanation = format!(
            "This claim has been fact-checked and rated FALSE by {} fact-checker(s) including: {}.",
            rated_false.len(),
            publishers(&rated_false)
        );
        if !rated_true.is_empty() {
            explanation.push_str(&format!(
                " {} other fact-check(s) rated it TRUE; false ratings take precedence.",
                rated_true.len()
            ));
        }
        return Assessment {
            verdict: Verdict::Fake,
            confidence: fact_check_confidence(rated_false.len()),
            explanation,
        };
    }

    if !rated_true.is_empty() {
        return Assessment {
            verdict: Verdict::Real,
            confidence: fact_check_confidence(rated_true.len()),
            explanation: format!(
                "This claim has been fact-checked and rated TRUE by {} fact-checker(s) including: {}.",
                rated_true.len(),
                publishers(&rated_true)
            ),
        };
    }

    let total = sources.len();
    let reputable_count = reputable.iter().take(total).filter(|r| **r).count();
    let inconclusive = fact_checks.len();

    if reputable_count >= MIN_REPUTABLE_SOURCES {
        return Assessment {
            verdict: Verdict::Real,
            confidence: reputable_confidence(reputable_count),
            explanation: format!(
                "Found {} source(s) discussing this claim, including {} reputable news outlet(s). \
                 The claim appears to be widely reported by credible sources.",
                total, reputable_count
            ),
        };
    }

    if total > 0 {
        let mut explanation = format!(
            "Found {} source(s) discussing this claim, including {} reputable outlet(s). \
             Insufficient evidence to verify this claim.",
            total, reputable_count
        );
        if inconclusive > 0 {
            explanation.push_str(&format!(
                " {} fact-check(s) found without a definitive rating.",
                inconclusive
            ));
        }
        return Assessment {
            verdict: Verdict::Unverified,
            confidence: PARTIAL_EVIDENCE_CONFIDENCE,
            explanation,
        };
    }

    let explanation = if inconclusive > 0 {
        format!(
            "No web sources found discussing this claim and {} fact-check(s) gave no definitive rating. \
             Unable to verify.",
            inconclusive
        )
    } else {
        "No web sources or fact-checks found discussing this claim. Unable to verify.".to_string()
    };
    Assessment {
        verdict: Verdict::Unverified,
        confidence: NO_EVIDENCE_CONFIDENCE,
        explanation,
    }
}
