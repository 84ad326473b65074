//! Request descriptors: endpoint, filter clauses and paging

use std::fmt;

use alexfetch_core::FetchError;
use reqwest::Url;

/// Public OpenAlex API root
pub const DEFAULT_BASE_URL: &str = "https://api.openalex.org";

/// Records requested per page unless configured otherwise
pub const DEFAULT_PER_PAGE: u32 = 50;

/// OpenAlex endpoints queried by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Scholarly works (papers, datasets, books, ...)
    Works,
    /// Research organizations
    Institutions,
}

impl Endpoint {
    /// URL path segment for this endpoint
    pub fn path(&self) -> &'static str {
        match self {
            Self::Works => "works",
            Self::Institutions => "institutions",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Right-hand side of a filter clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// `key:value`
    One(String),
    /// `key:v1|v2|...` (any of the values)
    AnyOf(Vec<String>),
}

/// One `field:value` constraint of the `filter` query parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub key: String,
    pub value: FilterValue,
}

impl Filter {
    /// `key:value`
    pub fn eq(key: impl Into<String>, value: impl ToString) -> Self {
        Self {
            key: key.into(),
            value: FilterValue::One(value.to_string()),
        }
    }

    /// `key:v1|v2|...`; an empty list is rejected when the query is built
    pub fn any_of<T: AsRef<str>>(key: impl Into<String>, values: &[T]) -> Self {
        Self {
            key: key.into(),
            value: FilterValue::AnyOf(values.iter().map(|v| v.as_ref().to_string()).collect()),
        }
    }

    fn validate(&self) -> Result<(), FetchError> {
        if self.key.is_empty() {
            return Err(FetchError::InvalidQuery("filter with empty key".to_string()));
        }
        if let FilterValue::AnyOf(values) = &self.value {
            if values.is_empty() {
                return Err(FetchError::InvalidQuery(format!(
                    "filter `{}` has no values",
                    self.key
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            FilterValue::One(v) => write!(f, "{}:{v}", self.key),
            FilterValue::AnyOf(values) => write!(f, "{}:{}", self.key, values.join("|")),
        }
    }
}

/// Render clauses as the `filter` parameter value (`a:1,b:x|y`)
pub fn render_filters(filters: &[Filter]) -> String {
    filters
        .iter()
        .map(Filter::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Immutable request descriptor for one page of one filtered endpoint.
///
/// Advancing yields a new value; the original is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    base_url: Url,
    endpoint: Endpoint,
    filters: Vec<Filter>,
    page: u32,
    per_page: u32,
    mailto: Option<String>,
}

impl Query {
    /// Build a query starting at page 1.
    ///
    /// Rejects non-HTTP(S) or relative base URLs, empty any-of clauses and a
    /// zero page size.
    pub fn new(
        base_url: &str,
        endpoint: Endpoint,
        filters: Vec<Filter>,
        per_page: u32,
    ) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidQuery(format!("base URL `{base_url}`: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(FetchError::InvalidQuery(format!(
                "base URL must be http(s), got `{}`",
                base_url.scheme()
            )));
        }
        if per_page == 0 {
            return Err(FetchError::InvalidQuery("page size must be positive".to_string()));
        }
        for filter in &filters {
            filter.validate()?;
        }
        Ok(Self {
            base_url,
            endpoint,
            filters,
            page: 1,
            per_page,
            mailto: None,
        })
    }

    /// Attach the polite-pool contact address
    pub fn with_mailto(mut self, mailto: Option<String>) -> Self {
        self.mailto = mailto.filter(|m| !m.is_empty());
        self
    }

    /// Same query at another page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Same query at the following page
    pub fn next_page(&self) -> Self {
        self.with_page(self.page + 1)
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// `{base}/{endpoint}?filter=...&page=N&per-page=M`
    pub fn url(&self) -> Url {
        let mut url = self.endpoint_url();
        {
            let mut pairs = url.query_pairs_mut();
            if !self.filters.is_empty() {
                pairs.append_pair("filter", &render_filters(&self.filters));
            }
            pairs.append_pair("page", &self.page.to_string());
            pairs.append_pair("per-page", &self.per_page.to_string());
            if let Some(mailto) = &self.mailto {
                pairs.append_pair("mailto", mailto);
            }
        }
        url
    }

    /// `{base}/{endpoint}?filter=...` without paging parameters, for
    /// single-page lookups that take the server's default page.
    pub fn unpaged_url(&self) -> Url {
        let mut url = self.endpoint_url();
        {
            let mut pairs = url.query_pairs_mut();
            if !self.filters.is_empty() {
                pairs.append_pair("filter", &render_filters(&self.filters));
            }
            if let Some(mailto) = &self.mailto {
                pairs.append_pair("mailto", mailto);
            }
        }
        url
    }

    fn endpoint_url(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}/{}", url.path().trim_end_matches('/'), self.endpoint.path());
        url.set_path(&path);
        url.set_query(None);
        url
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.endpoint, render_filters(&self.filters))
    }
}
