/// Minimum attributor confidence before a mismatch counts as impersonation.
pub const IMPERSONATION_THRESHOLD: f64 = 0.6;

fn canonical(source: &str) -> String {
    source.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// An article impersonates its claimed source when the style model confidently attributes it
/// to somebody else. An empty claim is never impersonation.
pub fn is_impersonation(predicted: &str, claimed: &str, confidence: f64) -> bool {
    let claimed = canonical(claimed);
    !claimed.is_empty() && confidence >= IMPERSONATION_THRESHOLD && canonical(predicted) != claimed
}
