//! Endpoint wrappers over the paginated fetcher

use std::sync::atomic::{AtomicUsize, Ordering};

use alexfetch_core::FetchError;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::fetcher::{Pages, collect_pages};
use crate::filters;
use crate::page::{HttpSource, PageSource, Record, parse_page};
use crate::query::{Endpoint, Filter, Query};
use crate::table::{PROVENANCE_COLUMN, RecordTable};

/// OpenAlex API client.
///
/// Every paginated wrapper is `fetch(endpoint, filters)` with a fixed
/// filter builder from [`filters`]. Requests go through `S`, which is the
/// shared HTTP client unless replaced with [`OpenAlex::with_source`].
pub struct OpenAlex<S = HttpSource> {
    source: S,
    config: ClientConfig,
    progress: ProgressBar,
}

impl OpenAlex<HttpSource> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_source(HttpSource, config)
    }
}

impl<S: PageSource> OpenAlex<S> {
    pub fn with_source(source: S, config: ClientConfig) -> Self {
        Self {
            source,
            config,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report page progress on `progress` (hidden by default)
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Page-1 query for `endpoint` under this client's settings
    pub fn query(&self, endpoint: Endpoint, filters: Vec<Filter>) -> Result<Query, FetchError> {
        Ok(
            Query::new(&self.config.base_url, endpoint, filters, self.config.per_page)?
                .with_mailto(self.config.mailto.clone()),
        )
    }

    /// Lazy page iterator for `query`, with this client's retry policy
    pub fn pages(&self, query: Query) -> Pages<'_, S> {
        self.pages_reporting(query, &self.progress)
    }

    fn pages_reporting(&self, query: Query, progress: &ProgressBar) -> Pages<'_, S> {
        Pages::new(&self.source, query)
            .with_retry(self.config.retry)
            .with_progress(progress.clone())
    }

    /// Fetch every page of a filtered endpoint into one table.
    ///
    /// All-or-nothing: any failed page fails the whole call.
    pub fn fetch(&self, endpoint: Endpoint, filters: Vec<Filter>) -> Result<RecordTable, FetchError> {
        self.fetch_reporting(endpoint, filters, &self.progress)
    }

    fn fetch_reporting(
        &self,
        endpoint: Endpoint,
        filters: Vec<Filter>,
        progress: &ProgressBar,
    ) -> Result<RecordTable, FetchError> {
        let query = self.query(endpoint, filters)?;
        log::debug!("fetching {query}");
        let records = collect_pages(self.pages_reporting(query.clone(), progress))?;
        log::info!("{query}: {} records", records.len());
        Ok(RecordTable::from_records(records))
    }

    /// Works for any of the given DOIs
    pub fn works_by_dois<T: AsRef<str>>(&self, dois: &[T]) -> Result<RecordTable, FetchError> {
        self.fetch(Endpoint::Works, filters::works_by_dois(dois))
    }

    /// Works by one author ID
    pub fn works_by_author(&self, author_id: &str) -> Result<RecordTable, FetchError> {
        self.fetch(Endpoint::Works, filters::works_by_author(author_id))
    }

    /// Works by corresponding institution, year, type and OA status
    pub fn works_by_corresponding_institutions<T: AsRef<str>>(
        &self,
        institution_ids: &[T],
        publication_year: i32,
        publication_types: &[T],
        oa_statuses: &[T],
    ) -> Result<RecordTable, FetchError> {
        self.fetch(
            Endpoint::Works,
            filters::works_by_corresponding_institutions(
                institution_ids,
                publication_year,
                publication_types,
                oa_statuses,
            ),
        )
    }

    /// Works affiliated with a ROR-identified institution in one year
    pub fn works_by_ror(&self, ror_id: &str, publication_year: i32) -> Result<RecordTable, FetchError> {
        self.fetch(Endpoint::Works, filters::works_by_ror(ror_id, publication_year))
    }

    /// Works cited by `work_id`, tagged with it in [`PROVENANCE_COLUMN`]
    pub fn outgoing_referenced_works(&self, work_id: &str) -> Result<RecordTable, FetchError> {
        self.fetch_for_seed(work_id, filters::outgoing_references, &self.progress)
    }

    /// Works citing `work_id`, tagged with it in [`PROVENANCE_COLUMN`]
    pub fn incoming_referenced_works(&self, work_id: &str) -> Result<RecordTable, FetchError> {
        self.fetch_for_seed(work_id, filters::incoming_references, &self.progress)
    }

    /// First institution matching a ROR ID.
    ///
    /// A single unpaged request; the rest of that page is ignored. No match
    /// is [`FetchError::NotFound`].
    pub fn institution_by_ror(&self, ror_id: &str) -> Result<Record, FetchError> {
        let query = self.query(Endpoint::Institutions, filters::institution_by_ror(ror_id))?;
        let url = query.unpaged_url();
        let label = query.to_string();
        let page = alexfetch_core::retry_with_backoff(&label, &self.config.retry, || {
            let body = self.source.get(&url)?;
            parse_page(&body)
        })?;
        log::debug!("{label}: {} matches", page.len());
        page.into_iter()
            .next()
            .ok_or_else(|| FetchError::NotFound(format!("no institution with ROR {ror_id}")))
    }

    fn fetch_for_seed(
        &self,
        seed: &str,
        build: fn(&str) -> Vec<Filter>,
        progress: &ProgressBar,
    ) -> Result<RecordTable, FetchError> {
        let mut table = self.fetch_reporting(Endpoint::Works, build(seed), progress)?;
        table.tag(PROVENANCE_COLUMN, Value::String(seed.to_string()));
        Ok(table)
    }
}

impl<S: PageSource + Sync> OpenAlex<S> {
    /// Reference lists of every seed work, concatenated in seed order
    pub fn all_outgoing_referenced_works<T: AsRef<str> + Sync>(
        &self,
        work_ids: &[T],
    ) -> Result<RecordTable, FetchError> {
        self.fetch_per_seed(work_ids, filters::outgoing_references)
    }

    /// Citing works of every seed work, concatenated in seed order
    pub fn all_incoming_referenced_works<T: AsRef<str> + Sync>(
        &self,
        work_ids: &[T],
    ) -> Result<RecordTable, FetchError> {
        self.fetch_per_seed(work_ids, filters::incoming_references)
    }

    /// Run the tagged per-seed fetch for every seed.
    ///
    /// With `seed_concurrency > 1` seeds run on a bounded pool; results are
    /// still concatenated in seed order and the first failing seed fails the
    /// call. The progress line counts finished seeds; per-seed pages are not
    /// reported since they interleave.
    fn fetch_per_seed<T: AsRef<str> + Sync>(
        &self,
        seeds: &[T],
        build: fn(&str) -> Vec<Filter>,
    ) -> Result<RecordTable, FetchError> {
        let total = seeds.len();
        let finished = AtomicUsize::new(0);
        let records = AtomicUsize::new(0);
        let run_seed = |seed: &T| -> Result<RecordTable, FetchError> {
            let table = self.fetch_for_seed(seed.as_ref(), build, &ProgressBar::hidden())?;
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            let rows = records.fetch_add(table.len(), Ordering::Relaxed) + table.len();
            self.progress
                .set_message(format!("{done}/{total} seeds, {rows} records"));
            Ok(table)
        };

        let workers = self.config.seed_concurrency.max(1);
        let tables = if workers > 1 && seeds.len() > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers.min(seeds.len()))
                .thread_name(|i| format!("seed-{i}"))
                .build()
                .map_err(|e| FetchError::Io(std::io::Error::other(e)))?;
            log::debug!("fetching {} seeds on {} threads", seeds.len(), pool.current_num_threads());
            pool.install(|| {
                seeds
                    .par_iter()
                    .map(run_seed)
                    .collect::<Result<Vec<_>, _>>()
            })?
        } else {
            seeds
                .iter()
                .map(run_seed)
                .collect::<Result<Vec<_>, _>>()?
        };
        let table = RecordTable::concat(tables);
        // workers may finish their last update out of order
        self.progress
            .set_message(format!("{total}/{total} seeds, {} records", table.len()));
        log::info!("{} seeds: {} records", seeds.len(), table.len());
        Ok(table)
    }
}
