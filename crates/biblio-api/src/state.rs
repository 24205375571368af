use biblio_core::CrawlPacing;
use biblio_db::Database;

/// Shared application state, available to all route handlers via
/// `State<Arc<AppState>>`.
pub struct AppState {
    pub db: Database,
    /// Inter-category pacing applied by the full-crawl endpoint.
    pub pacing: CrawlPacing,
}
