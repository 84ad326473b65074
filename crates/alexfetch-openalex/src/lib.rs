//! Alexfetch OpenAlex - paginated client for the OpenAlex REST API
//!
//! Every endpoint wrapper is a filter table over one generic fetcher that
//! requests `page=1, 2, ...` until the API answers with an empty page.
//!
//! # Example
//!
//! ```no_run
//! use alexfetch_openalex::{ClientConfig, OpenAlex};
//!
//! let client = OpenAlex::new(ClientConfig::default());
//! let works = client.works_by_author("A5023888391").expect("fetch failed");
//! println!("{} works, {} columns", works.len(), works.columns().len());
//! ```

pub mod client;
pub mod config;
pub mod export;
pub mod fetcher;
pub mod filters;
pub mod page;
pub mod query;
pub mod table;

// Re-exports for convenience
pub use alexfetch_core::{FetchError, RetryPolicy};
pub use client::OpenAlex;
pub use config::ClientConfig;
pub use fetcher::{Pages, collect_pages, fetch_all};
pub use page::{HttpSource, Page, PageSource, Record, parse_page};
pub use query::{DEFAULT_BASE_URL, DEFAULT_PER_PAGE, Endpoint, Filter, FilterValue, Query};
pub use table::{PROVENANCE_COLUMN, RecordTable};
