//! Cursor walking over paginated collections

use std::future::Future;

use futures::future::BoxFuture;
use tracing::debug;

use kalshi_types::{Page, PageCap, Paginated};

use crate::error::RestResult;

type PageFetcher<'a, T> =
    Box<dyn FnMut(Option<String>) -> BoxFuture<'a, RestResult<Page<T>>> + Send + 'a>;

/// Walks a collection page by page, threading the cursor between calls
///
/// The walk ends when a page comes back without a cursor, or when the
/// [`PageCap`] is reached. A page may be empty and still carry a cursor, in
/// which case the walk continues.
pub struct PaginatedResource<'a, T> {
    fetch: PageFetcher<'a, T>,
    cursor: Option<String>,
    cap: PageCap,
    pages_fetched: usize,
    items_yielded: usize,
    done: bool,
}

impl<'a, T: Send + 'a> PaginatedResource<'a, T> {
    /// Walk with a single-page fetch function taking the cursor
    pub fn new<F, Fut>(mut fetch: F) -> Self
    where
        F: FnMut(Option<String>) -> Fut + Send + 'a,
        Fut: Future<Output = RestResult<Page<T>>> + Send + 'a,
    {
        Self {
            fetch: Box::new(move |cursor| -> BoxFuture<'a, RestResult<Page<T>>> {
                Box::pin(fetch(cursor))
            }),
            cursor: None,
            cap: PageCap::unbounded(),
            pages_fetched: 0,
            items_yielded: 0,
            done: false,
        }
    }

    /// Walk a parameter set, starting from its own cursor
    pub fn from_params<P, F, Fut>(params: P, mut fetch: F) -> Self
    where
        P: Paginated + Send + 'a,
        F: FnMut(P) -> Fut + Send + 'a,
        Fut: Future<Output = RestResult<Page<T>>> + Send + 'a,
    {
        let start = params.cursor().map(str::to_string);
        Self::new(move |cursor| {
            let mut params = params.clone();
            params.set_cursor(cursor);
            fetch(params)
        })
        .starting_at(start)
    }

    /// Resume from a known cursor
    pub fn starting_at(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor.filter(|c| !c.is_empty());
        self
    }

    pub fn with_cap(mut self, cap: PageCap) -> Self {
        self.cap = cap;
        self
    }

    /// Cursor the next fetch will use
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Fetch the next page, or `None` once the walk is over
    ///
    /// A failed fetch leaves the cursor untouched, so the call can be repeated.
    pub async fn next_page(&mut self) -> RestResult<Option<Page<T>>> {
        if self.done || self.cap_reached() {
            self.done = true;
            return Ok(None);
        }

        let mut page = (self.fetch)(self.cursor.clone()).await?;
        self.pages_fetched += 1;

        if let Some(max) = self.cap.max_items {
            page.items.truncate(max.saturating_sub(self.items_yielded));
        }
        self.items_yielded += page.items.len();

        debug!(
            page = self.pages_fetched,
            items = page.items.len(),
            has_more = page.has_more(),
            "Fetched page"
        );

        self.cursor = page.cursor.clone();
        if self.cursor.is_none() {
            self.done = true;
        }
        Ok(Some(page))
    }

    /// Fetch every remaining page and concatenate the items
    pub async fn collect(mut self) -> RestResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page.items);
        }
        Ok(items)
    }

    fn cap_reached(&self) -> bool {
        let pages = self
            .cap
            .max_pages
            .is_some_and(|max| self.pages_fetched >= max);
        let items = self
            .cap
            .max_items
            .is_some_and(|max| self.items_yielded >= max);
        pages || items
    }
}

impl<T> std::fmt::Debug for PaginatedResource<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedResource")
            .field("cursor", &self.cursor)
            .field("cap", &self.cap)
            .field("pages_fetched", &self.pages_fetched)
            .field("done", &self.done)
            .finish()
    }
}
