//! End-to-end tests of the HTTP path against a local mock OpenAlex.
//!
//! The client is blocking, so the mock server lives on its own runtime and
//! the client is driven from the plain test thread.

use std::time::Duration;

use alexfetch_openalex::{ClientConfig, FetchError, OpenAlex, PROVENANCE_COLUMN, RetryPolicy};
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

struct MockApi {
    server: MockServer,
    rt: Runtime,
}

impl MockApi {
    fn start() -> Self {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        let server = rt.block_on(MockServer::start());
        let api = Self { server, rt };
        // anything not explicitly mounted is the terminating empty page
        api.mount(
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
                .with_priority(10),
        );
        api
    }

    fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    fn requests(&self) -> Vec<Request> {
        self.rt
            .block_on(self.server.received_requests())
            .expect("request recording enabled")
    }

    fn client(&self, per_page: u32) -> OpenAlex {
        self.client_with(ClientConfig {
            per_page,
            ..Default::default()
        })
    }

    /// Client for `config`, pointed at this server
    fn client_with(&self, config: ClientConfig) -> OpenAlex {
        OpenAlex::new(ClientConfig {
            base_url: self.server.uri(),
            ..config
        })
    }
}

fn page(ids: &[&str]) -> ResponseTemplate {
    let results: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
    ResponseTemplate::new(200).set_body_json(json!({"meta": {"count": 99}, "results": results}))
}

fn param(request: &Request, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn ids(rows: &[serde_json::Map<String, Value>]) -> Vec<String> {
    rows.iter()
        .map(|r| r["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn paginates_until_empty_page() {
    let api = MockApi::start();
    for (n, body) in [("1", page(&["W1", "W2"])), ("2", page(&["W3", "W4"]))] {
        api.mount(
            Mock::given(method("GET"))
                .and(path("/works"))
                .and(query_param("filter", "author.id:A1"))
                .and(query_param("page", n))
                .and(query_param("per-page", "2"))
                .respond_with(body),
        );
    }

    let table = api.client(2).works_by_author("A1").expect("fetch");
    assert_eq!(ids(table.rows()), vec!["W1", "W2", "W3", "W4"]);

    let requests = api.requests();
    assert_eq!(requests.len(), 3);
    let pages: Vec<_> = requests.iter().filter_map(|r| param(r, "page")).collect();
    assert_eq!(pages, vec!["1", "2", "3"]);
}

#[test]
fn dois_are_sent_as_disjunction() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(path("/works"))
            .and(query_param("filter", "doi:10.1/a|10.1/b"))
            .and(query_param("page", "1"))
            .respond_with(page(&["W1", "W2"])),
    );
    let table = api.client(50).works_by_dois(&["10.1/a", "10.1/b"]).expect("fetch");
    assert_eq!(table.len(), 2);
}

#[test]
fn server_error_aborts_whole_fetch() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(page(&["W1"])),
    );
    api.mount(
        Mock::given(method("GET"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500)),
    );

    let err = api.client(1).works_by_author("A1").unwrap_err();
    assert!(matches!(err, FetchError::Http { status: Some(500), .. }));
    assert_eq!(api.requests().len(), 2);
}

#[test]
fn malformed_body_is_json_error() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>")),
    );
    let err = api.client(50).works_by_ror("02y3ad647", 2020).unwrap_err();
    assert!(matches!(err, FetchError::Json(_)));
}

#[test]
fn retry_policy_recovers_from_transient_error() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .with_priority(1),
    );
    api.mount(
        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(page(&["W1"])),
    );

    let client = api.client_with(ClientConfig {
        per_page: 1,
        retry: RetryPolicy::new(2, Duration::from_millis(10)),
        ..Default::default()
    });
    let table = client.works_by_author("A1").expect("fetch after retry");
    assert_eq!(table.len(), 1);

    // the failed page is requested again, then pagination carries on
    let requests = api.requests();
    let pages: Vec<_> = requests.iter().filter_map(|r| param(r, "page")).collect();
    assert_eq!(pages, vec!["1", "1", "2"]);
    assert!(requests
        .iter()
        .all(|r| param(r, "per-page").as_deref() == Some("1")));
}

#[test]
fn without_retry_transient_error_is_fatal() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(503)),
    );
    let err = api.client(50).works_by_author("A1").unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(api.requests().len(), 1);
}

#[test]
fn institution_lookup_takes_first_match() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(path("/institutions"))
            .and(query_param("filter", "ror:https://ror.org/02y3ad647"))
            .respond_with(page(&["I1", "I2"]))
            .with_priority(1),
    );
    let record = api
        .client(50)
        .institution_by_ror("https://ror.org/02y3ad647")
        .expect("lookup");
    assert_eq!(record["id"], "I1");

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(param(&requests[0], "page"), None);
}

#[test]
fn institution_lookup_without_match_is_not_found() {
    let api = MockApi::start();
    let err = api.client(50).institution_by_ror("00000").unwrap_err();
    assert!(matches!(err, FetchError::NotFound(_)));
}

#[test]
fn incoming_references_tagged_per_seed() {
    let api = MockApi::start();
    api.mount(
        Mock::given(method("GET"))
            .and(query_param("filter", "cites:W1"))
            .and(query_param("page", "1"))
            .respond_with(page(&["W10", "W11"])),
    );
    api.mount(
        Mock::given(method("GET"))
            .and(query_param("filter", "cites:W2"))
            .and(query_param("page", "1"))
            .respond_with(page(&["W20"])),
    );

    let table = api
        .client(50)
        .all_incoming_referenced_works(&["W1", "W2"])
        .expect("fetch");
    assert_eq!(ids(table.rows()), vec!["W10", "W11", "W20"]);
    let tags: Vec<_> = table
        .column(PROVENANCE_COLUMN)
        .map(|v| v.and_then(Value::as_str).unwrap_or_default().to_string())
        .collect();
    assert_eq!(tags, vec!["W1", "W1", "W2"]);
    // one data page + one empty page per seed
    assert_eq!(api.requests().len(), 4);
}
