pub mod book_repository;
pub mod category_repository;
pub mod config;
pub mod database;

pub use book_repository::BookRepository;
pub use category_repository::CategoryRepository;
pub use config::DatabaseConfig;
pub use database::Database;

/// True when a sqlx error is a uniqueness-constraint violation — the
/// expected outcome of two crawls racing on the same natural key.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
