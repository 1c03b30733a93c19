pub mod normalize;
pub mod outlets;
pub mod query;
pub mod verdict;
pub mod verifier;

pub use normalize::{deduplicate_fact_checks, deduplicate_sources, normalize_url};
pub use outlets::{classify, is_reputable};
pub use query::build_query;
pub use verdict::assess;
pub use verifier::Verifier;

pub mod prelude {
    pub use super::Verifier;
    pub use nt_core::{Error, Result, Verdict, VerificationResult};
}
