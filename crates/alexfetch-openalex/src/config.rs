//! OpenAlex client configuration

use alexfetch_core::RetryPolicy;

use crate::query::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE};

/// Runtime configuration for [`OpenAlex`](crate::OpenAlex)
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.openalex.org`
    pub base_url: String,
    /// Records per page
    pub per_page: u32,
    /// Contact address for the polite pool (`mailto` parameter)
    pub mailto: Option<String>,
    /// Retry policy per page request (none by default)
    pub retry: RetryPolicy,
    /// Seeds fetched at once by the multi-seed wrappers (1 = sequential)
    pub seed_concurrency: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            per_page: DEFAULT_PER_PAGE,
            mailto: None,
            retry: RetryPolicy::none(),
            seed_concurrency: 1,
        }
    }
}
