pub mod headlines;
pub mod logging;
pub mod providers;

pub use headlines::HeadlineFeed;
pub use logging::Logger;
pub use providers::{default_providers, DuckDuckGoProvider, FactCheckProvider, GNewsProvider};

pub mod prelude {
    pub use super::providers::default_providers;
    pub use nt_core::{Evidence, ProviderError, ProviderKind, SearchProvider};
}
