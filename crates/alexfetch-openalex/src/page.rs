//! One page of results: the transport seam and the response decoder

use alexfetch_core::{FetchError, get_text};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};

/// One API record: an arbitrary JSON object
pub type Record = Map<String, Value>;

/// Records returned by a single request; empty means "no more pages"
pub type Page = Vec<Record>;

/// Issues one GET and returns the raw response body.
///
/// The HTTP implementation is [`HttpSource`]; tests substitute canned bodies.
pub trait PageSource {
    fn get(&self, url: &Url) -> Result<String, FetchError>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn get(&self, url: &Url) -> Result<String, FetchError> {
        (**self).get(url)
    }
}

/// Blocking GET through the shared HTTP client
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpSource;

impl PageSource for HttpSource {
    fn get(&self, url: &Url) -> Result<String, FetchError> {
        get_text(url.as_str())
    }
}

/// Top-level response envelope; only `results` is consumed
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    results: Option<Value>,
}

/// Decode a response body into its page of records.
///
/// A missing or null `results` is an empty page. A `results` that is not an
/// array, or an entry that is not an object, is a shape error.
pub fn parse_page(body: &str) -> Result<Page, FetchError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    match envelope.results {
        None | Some(Value::Null) => Ok(Page::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(FetchError::Shape(format!(
                    "results[{i}] is {}, expected an object",
                    json_kind(&other)
                ))),
            })
            .collect(),
        Some(other) => Err(FetchError::Shape(format!(
            "`results` is {}, expected an array",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
