//! Blocking HTTP GET over a shared async client.
//!
//! Uses async reqwest internally on a shared tokio runtime, but presents a
//! sync interface: each call owns its response and releases the connection
//! back to the pool before returning.

use std::sync::{LazyLock, OnceLock};
use std::time::Duration;

use crate::error::FetchError;

/// Global HTTP settings, applied once before the first request.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// `User-Agent` header sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(30),
            user_agent: concat!("alexfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

static HTTP_CONFIG: OnceLock<HttpConfig> = OnceLock::new();

/// Install global HTTP settings.
///
/// Only the first call wins; the shared client is built from whatever is
/// installed when the first request goes out.
pub fn set_http_config(config: HttpConfig) {
    if HTTP_CONFIG.set(config).is_err() {
        log::warn!("HTTP config already set, ignoring update");
    }
}

/// Current global HTTP settings (defaults when never set).
pub fn http_config() -> &'static HttpConfig {
    HTTP_CONFIG.get_or_init(HttpConfig::default)
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    let config = http_config();
    reqwest::Client::builder()
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .pool_max_idle_per_host(8)
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// HTTP GET → response body as text.
///
/// Non-2xx statuses are errors. Must not be called from inside an async
/// context.
pub fn get_text(url: &str) -> Result<String, FetchError> {
    SHARED_RUNTIME.handle().block_on(async {
        let response = http_client()
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::from_reqwest(&e))?;
        response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(&e))
    })
}
