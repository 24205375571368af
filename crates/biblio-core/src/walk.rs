//! Lazy pagination over a category's listing pages.
//!
//! [`ListingWalker`] yields the item-detail URLs of one listing page per
//! call, following "next page" links until the chain ends. The sequence is
//! finite and not restartable; consumers may stop early or bound the total
//! number of pages. A fetch failure aborts the walk and propagates — there
//! is no partial-page retry.

use std::collections::HashSet;

use url::Url;

use crate::error::AppError;
use crate::extract;
use crate::traits::Fetcher;

pub struct ListingWalker<F: Fetcher> {
    fetcher: F,
    next: Option<Url>,
    visited: HashSet<String>,
    pages_walked: usize,
    max_pages: Option<usize>,
}

impl<F: Fetcher> ListingWalker<F> {
    /// Start a walk at a category's first listing page.
    pub fn new(fetcher: F, start: Url) -> Self {
        Self {
            fetcher,
            next: Some(start),
            visited: HashSet::new(),
            pages_walked: 0,
            max_pages: None,
        }
    }

    /// Hard bound on the number of pages fetched.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Fetch and parse the next listing page, returning its item-detail
    /// URLs in page order, or `Ok(None)` once the walk is exhausted.
    ///
    /// A next link that points at a page this walk has already visited
    /// ends the walk with a warning instead of looping forever.
    pub async fn next_page(&mut self) -> Result<Option<Vec<String>>, AppError> {
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        if let Some(max) = self.max_pages {
            if self.pages_walked >= max {
                tracing::warn!(max_pages = max, "page bound reached, stopping walk");
                return Ok(None);
            }
        }

        if !self.visited.insert(url.to_string()) {
            tracing::warn!(%url, "pagination loop detected, stopping walk");
            return Ok(None);
        }

        tracing::debug!(%url, page = self.pages_walked + 1, "fetching listing page");
        let html = self.fetcher.fetch(url.as_str()).await?;
        let page = extract::parse_listing_page(&html, &url);

        self.pages_walked += 1;
        self.next = page.next_url;

        Ok(Some(page.item_urls))
    }
}
