use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{Evidence, ProviderKind};

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Which kind of external source this client talks to
    fn kind(&self) -> ProviderKind;

    /// False when the provider lacks the credentials it needs. Unavailable providers are
    /// skipped without issuing a request.
    fn is_available(&self) -> bool {
        true
    }

    /// Searches the provider for evidence about `query`
    async fn search(&self, query: &str) -> std::result::Result<Vec<Evidence>, ProviderError>;
}
