//! Page-based registry search exposed as a lazy stream.
//!
//! A search is a `PUT` of the criteria plus `Page`/`Limit`. One probe request
//! (`Page=1, Limit=1`) learns `TotaltAntalPoster`, then pages of
//! [`SEARCH_PAGE_SIZE`] are fetched one at a time as the consumer polls.
//! Dropping the stream stops all further requests.

use std::sync::Arc;

use futures::future;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use gradebridge_domain::constants::{SEARCH_PAGE_SIZE, SEARCH_PROBE_LIMIT, SEARCH_TOTAL_FIELD};
use gradebridge_domain::{GradeBridgeError, Result, SearchCriteria, SearchPage};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use super::client::RegistryClient;

/// Lazy sequence of search pages.
pub type SearchStream = BoxStream<'static, Result<SearchPage>>;

/// Lazy sequence of decoded search results, in server order.
pub type ElementStream<T> = BoxStream<'static, Result<T>>;

/// Number of page requests needed for `total` hits.
#[must_use]
pub fn page_count(total: u64) -> u64 {
    total.div_ceil(u64::from(SEARCH_PAGE_SIZE))
}

enum Cursor {
    Probe,
    Page { next: u32, total: u64 },
}

struct SearchRequest {
    client: RegistryClient,
    endpoint: String,
    criteria: SearchCriteria,
}

impl SearchRequest {
    async fn probe_total(&self) -> Result<u64> {
        let body: Value = self
            .client
            .request(&self.endpoint, Method::PUT, &self.criteria.paged(1, SEARCH_PROBE_LIMIT))
            .await?;

        body.get(SEARCH_TOTAL_FIELD).and_then(Value::as_u64).ok_or_else(|| {
            GradeBridgeError::InvalidResponse(format!(
                "search probe for {} has no numeric '{SEARCH_TOTAL_FIELD}'",
                self.endpoint
            ))
        })
    }

    async fn fetch_page(&self, page: u32, total: u64) -> Result<SearchPage> {
        debug!(endpoint = %self.endpoint, page, "fetching search page");
        let body: Value = self
            .client
            .request(&self.endpoint, Method::PUT, &self.criteria.paged(page, SEARCH_PAGE_SIZE))
            .await?;

        Ok(SearchPage { page, total_count: total, body })
    }

    async fn advance(self: Arc<Self>, cursor: Cursor) -> Result<Option<(SearchPage, Cursor)>> {
        let (next, total) = match cursor {
            Cursor::Probe => {
                let total = self.probe_total().await?;
                info!(
                    endpoint = %self.endpoint,
                    total,
                    pages = page_count(total),
                    "registry search started"
                );
                (1, total)
            }
            Cursor::Page { next, total } => (next, total),
        };

        if u64::from(next - 1) * u64::from(SEARCH_PAGE_SIZE) >= total {
            return Ok(None);
        }

        let page = self.fetch_page(next, total).await?;
        Ok(Some((page, Cursor::Page { next: next + 1, total })))
    }
}

impl RegistryClient {
    /// Lazily page through a search.
    ///
    /// Nothing is sent until the stream is first polled. The first failure is
    /// yielded and ends the stream; pages already yielded stand.
    pub fn search(&self, endpoint: impl Into<String>, criteria: SearchCriteria) -> SearchStream {
        let request = Arc::new(SearchRequest {
            client: self.clone(),
            endpoint: endpoint.into(),
            criteria,
        });

        stream::try_unfold(Cursor::Probe, move |cursor| Arc::clone(&request).advance(cursor))
            .boxed()
    }

    /// Lazily yield every element stored under `key`, page by page.
    ///
    /// A page whose `key` is missing, not an array, or holds an element that
    /// does not decode as `T` fails with `InvalidResponse`.
    pub fn search_elements<T>(
        &self,
        endpoint: impl Into<String>,
        criteria: SearchCriteria,
        key: impl Into<String>,
    ) -> ElementStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let key = key.into();
        self.search(endpoint, criteria)
            .and_then(move |page| future::ready(page.into_elements::<T>(&key)))
            .map_ok(|items| stream::iter(items.into_iter().map(Ok::<T, GradeBridgeError>)))
            .try_flatten()
            .boxed()
    }

    /// Drain [`RegistryClient::search_elements`] into a vector.
    ///
    /// # Errors
    /// The first failure of the underlying stream.
    pub async fn search_all<T>(
        &self,
        endpoint: impl Into<String>,
        criteria: SearchCriteria,
        key: impl Into<String>,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.search_elements(endpoint, criteria, key).try_collect().await
    }
}
