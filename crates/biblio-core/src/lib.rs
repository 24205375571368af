pub mod crawl;
pub mod error;
pub mod extract;
pub mod models;
pub mod pacing;
pub mod site;
pub mod testutil;
pub mod traits;
pub mod walk;

pub use crawl::CrawlService;
pub use error::AppError;
pub use models::{Book, BookRecord, Category, NewBook};
pub use pacing::CrawlPacing;
pub use traits::{BookStore, CategoryStore, Fetcher};
pub use walk::ListingWalker;
