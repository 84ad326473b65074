//! Paginated-collection fetcher
//!
//! Requests `page = 1, 2, 3, ...` of a [`Query`] until a page comes back
//! empty. There is no page cap: the empty page is the only stop signal, so
//! a server that never returns one keeps the loop going.

use std::iter::FusedIterator;

use alexfetch_core::{FetchError, RetryPolicy, retry_with_backoff};
use indicatif::ProgressBar;

use crate::page::{Page, PageSource, Record, parse_page};
use crate::query::Query;

/// Lazy sequence of non-empty pages for one query.
///
/// Each `next()` issues exactly one request (plus retries, if a policy is
/// set). Iteration ends after the first empty page or the first error; the
/// error itself is yielded once. Start over by building a new `Pages` from
/// the query.
pub struct Pages<'a, S: ?Sized> {
    source: &'a S,
    next: Query,
    retry: RetryPolicy,
    progress: ProgressBar,
    records: usize,
    done: bool,
}

impl<'a, S: PageSource + ?Sized> Pages<'a, S> {
    pub fn new(source: &'a S, query: Query) -> Self {
        Self {
            source,
            next: query,
            retry: RetryPolicy::none(),
            progress: ProgressBar::hidden(),
            records: 0,
            done: false,
        }
    }

    /// Retry transient failures of each page request
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Report page/record counts on a progress line
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Page number the next request will ask for
    pub fn next_page(&self) -> u32 {
        self.next.page()
    }

    /// Records yielded so far
    pub fn records_seen(&self) -> usize {
        self.records
    }
}

impl<S: PageSource + ?Sized> Iterator for Pages<'_, S> {
    type Item = Result<Page, FetchError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let page_no = self.next.page();
        let url = self.next.url();
        let label = format!("{} page {page_no}", self.next);
        let result = retry_with_backoff(&label, &self.retry, || {
            let body = self.source.get(&url)?;
            parse_page(&body)
        });
        match result {
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
            Ok(page) if page.is_empty() => {
                log::debug!("{label}: empty, done");
                self.done = true;
                None
            }
            Ok(page) => {
                self.records += page.len();
                log::debug!("{label}: {} records", page.len());
                self.progress
                    .set_message(format!("page {page_no}, {} records", self.records));
                self.next = self.next.next_page();
                Some(Ok(page))
            }
        }
    }
}

impl<S: PageSource + ?Sized> FusedIterator for Pages<'_, S> {}

/// Drain `pages` into one ordered collection.
///
/// All-or-nothing: the first error discards every page gathered so far.
pub fn collect_pages<S: PageSource + ?Sized>(pages: Pages<'_, S>) -> Result<Vec<Record>, FetchError> {
    let mut records = Vec::new();
    let mut count = 0u32;
    for page in pages {
        records.extend(page?);
        count += 1;
    }
    log::debug!("collected {} records from {count} pages", records.len());
    Ok(records)
}

/// Fetch every page of `query` and concatenate them in page order.
pub fn fetch_all<S: PageSource + ?Sized>(source: &S, query: Query) -> Result<Vec<Record>, FetchError> {
    collect_pages(Pages::new(source, query))
}
