//! Error type shared by every OpenAlex request path

/// Error from fetching or decoding an OpenAlex response.
///
/// Transport and decode failures are fatal by default; only the retry
/// policy inspects [`FetchError::is_retryable`].
#[derive(Debug)]
pub enum FetchError {
    /// Transport failure or non-2xx response, with status when one was received
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Response body is not valid JSON
    Json(serde_json::Error),
    /// Valid JSON with an unexpected shape (e.g. `results` is not an array)
    Shape(String),
    /// Single-record lookup matched nothing
    NotFound(String),
    /// Request descriptor rejected before any network call
    InvalidQuery(String),
    /// Local I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Json(e) => write!(f, "invalid JSON: {e}"),
            Self::Shape(msg) => write!(f, "unexpected response shape: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::InvalidQuery(msg) => write!(f, "invalid query: {msg}"),
            Self::Io(e) => write!(f, "IO: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl FetchError {
    /// Create HTTP error from reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Connection-level failures (no status), 429 and 5xx are transient.
    /// Everything else, including malformed bodies, is permanent.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, None | Some(429) | Some(500..=599)),
            _ => false,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
