use std::sync::Arc;

use nt_core::{Config, Result, SearchProvider};

pub mod duckduckgo;
pub mod factcheck;
pub mod gnews;

pub use duckduckgo::DuckDuckGoProvider;
pub use factcheck::FactCheckProvider;
pub use gnews::GNewsProvider;

/// Every provider the service knows about, in invocation order. Providers without
/// credentials are still returned; they report themselves unavailable.
pub fn default_providers(config: &Config) -> Result<Vec<Arc<dyn SearchProvider>>> {
    Ok(vec![
        Arc::new(GNewsProvider::new(
            config.gnews_api_key.clone(),
            config.provider_timeout,
        )?),
        Arc::new(FactCheckProvider::new(
            config.factcheck_api_key.clone(),
            config.provider_timeout,
        )?),
        Arc::new(DuckDuckGoProvider::new(config.provider_timeout)?),
    ])
}

/// Common utilities for provider clients
pub(crate) mod utils {
    use std::time::Duration;

    use reqwest::Client;
    use serde::de::DeserializeOwned;
    use serde_json::Value;

    use crate::logging::Logger;

    pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    pub fn http_client(timeout: Duration) -> nt_core::Result<Client> {
        Ok(Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?)
    }

    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Decodes one item of a response list. An item of the wrong shape is logged and skipped
    /// so the rest of the list still counts.
    pub fn decode_item<T: DeserializeOwned>(item: Value, what: &str, log: &Logger) -> Option<T> {
        match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log.warn(&format!("skipping malformed {}: {}", what, e));
                None
            }
        }
    }

    pub fn non_empty(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
