use std::future::Future;

use crate::error::AppError;
use crate::models::{Book, BookRecord, Category, NewBook};

/// Fetches raw HTML content from a URL.
///
/// Implementations apply their own timeout and user-agent. A failure is
/// final: the crawler never retries, it propagates and lets the caller
/// abort or skip the current unit of work.
pub trait Fetcher: Send + Sync + Clone {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Persists and retrieves categories, deduplicated by name.
pub trait CategoryStore: Send + Sync + Clone {
    /// Return the category with this name, creating and persisting it first
    /// if absent. An existing record is returned unchanged.
    fn find_or_create(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Category, AppError>> + Send;

    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Category>, AppError>> + Send;

    /// All stored categories in insertion order.
    fn list(&self) -> impl Future<Output = Result<Vec<Category>, AppError>> + Send;

    fn count(&self) -> impl Future<Output = Result<i64, AppError>> + Send;
}

/// Persists and retrieves books, deduplicated by source URL.
pub trait BookStore: Send + Sync + Clone {
    fn exists_by_url(&self, url: &str) -> impl Future<Output = Result<bool, AppError>> + Send;

    /// Insert a new book. Fails with [`AppError::Duplicate`] when the URL is
    /// already stored — callers treat that as a benign skip, never as a
    /// reason to overwrite.
    fn save(&self, book: &NewBook) -> impl Future<Output = Result<Book, AppError>> + Send;

    /// Stored books as flattened records, optionally filtered by category
    /// name, in insertion order.
    fn list(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = Result<Vec<BookRecord>, AppError>> + Send;

    fn count(
        &self,
        category: Option<&str>,
    ) -> impl Future<Output = Result<i64, AppError>> + Send;
}
