//! Alexfetch Core - Common infrastructure for OpenAlex API clients
//!
//! This crate provides the shared HTTP plumbing, error type, retry policy,
//! logging and progress helpers used by the endpoint crates and the CLI.

pub mod error;
pub mod http;
pub mod literal;
pub mod logging;
pub mod progress;
pub mod retry;

// Re-exports for convenience
pub use error::FetchError;
pub use http::{HttpConfig, SHARED_RUNTIME, get_text, http_client, http_config, set_http_config};
pub use literal::{Literal, decode_literal, decode_literal_json};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use retry::{RetryPolicy, retry_with_backoff};
