//! Crawl orchestration: category discovery, per-category item crawls, and
//! the paced full crawl.
//!
//! Generic over the fetcher and both stores via traits, enabling dependency
//! injection and testability without real HTTP or a real database.

use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::extract;
use crate::models::{Book, Category};
use crate::pacing::CrawlPacing;
use crate::site;
use crate::traits::{BookStore, CategoryStore, Fetcher};
use crate::walk::ListingWalker;

pub struct CrawlService<F, CS, BS>
where
    F: Fetcher,
    CS: CategoryStore,
    BS: BookStore,
{
    fetcher: F,
    categories: CS,
    books: BS,
    pacing: CrawlPacing,
}

impl<F, CS, BS> CrawlService<F, CS, BS>
where
    F: Fetcher,
    CS: CategoryStore,
    BS: BookStore,
{
    pub fn new(fetcher: F, categories: CS, books: BS, pacing: CrawlPacing) -> Self {
        Self {
            fetcher,
            categories,
            books,
            pacing,
        }
    }

    /// Fetch the site root, extract the category navigation, and
    /// find-or-create every name. Returns the full set — existing and
    /// newly created — in document order.
    pub async fn crawl_categories(&self) -> Result<Vec<Category>, AppError> {
        tracing::info!("Crawling categories from {}", site::BASE_URL);
        let html = self.fetcher.fetch(site::BASE_URL).await?;
        let names = extract::extract_categories(&html);

        let mut categories = Vec::with_capacity(names.len());
        for name in &names {
            let category = self.categories.find_or_create(name).await?;
            categories.push(category);
        }

        tracing::info!(count = categories.len(), "Category crawl complete");
        Ok(categories)
    }

    /// Crawl every listing page of one category and persist the books not
    /// seen before. Returns only the books created by this call.
    ///
    /// Fails with [`AppError::NotFound`] when the category was never
    /// crawled. The duplicate check runs before the detail fetch, so
    /// already-stored URLs cost no extra request.
    pub async fn crawl_category(&self, name: &str) -> Result<Vec<Book>, AppError> {
        let category = self
            .categories
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("category not found: {name}")))?;

        tracing::info!(category = %category.name, "Crawling category");
        let start = site::category_listing_url(&category.name)?;
        let mut walker = ListingWalker::new(self.fetcher.clone(), start);

        let mut created = Vec::new();
        while let Some(item_urls) = walker.next_page().await? {
            for url in item_urls {
                if self.books.exists_by_url(&url).await? {
                    tracing::debug!(%url, "already stored, skipping");
                    continue;
                }

                let html = self.fetcher.fetch(&url).await?;
                let book = extract::extract_book_detail(&html, &url, category.id);
                match self.books.save(&book).await {
                    Ok(saved) => {
                        tracing::debug!(title = %saved.title, "stored new book");
                        created.push(saved);
                    }
                    // A concurrent crawl got there first; the stored row wins.
                    Err(AppError::Duplicate(_)) => {
                        tracing::debug!(%url, "already stored by a concurrent crawl, skipping");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        tracing::info!(
            category = %category.name,
            new_books = created.len(),
            "Category crawl complete"
        );
        Ok(created)
    }

    /// Crawl categories, then every category's items in order, pausing for
    /// the pacing delay between categories.
    ///
    /// A category whose crawl fails at the transport layer is logged and
    /// skipped — one bad category does not abort the run. An interrupt
    /// during the pacing pause abandons the remaining categories; books
    /// persisted so far stay persisted.
    pub async fn crawl_all(&self, cancel: &CancellationToken) -> Result<Vec<Book>, AppError> {
        let categories = self.crawl_categories().await?;
        let mut all_books = Vec::new();

        for (i, category) in categories.iter().enumerate() {
            match self.crawl_category(&category.name).await {
                Ok(mut books) => all_books.append(&mut books),
                Err(e) if e.is_transport() => {
                    tracing::error!(
                        category = %category.name,
                        error = %e,
                        "Category crawl failed, continuing with the next"
                    );
                }
                Err(e) => return Err(e),
            }

            if i + 1 < categories.len() {
                match self.pacing.pause(cancel).await {
                    Ok(()) => {}
                    Err(AppError::Interrupted) => {
                        tracing::warn!("Crawl interrupted, abandoning remaining categories");
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        tracing::info!(total_new_books = all_books.len(), "Full crawl complete");
        Ok(all_books)
    }
}
