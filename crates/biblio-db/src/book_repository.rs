use biblio_core::error::AppError;
use biblio_core::models::{Book, BookRecord, NewBook};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use crate::is_unique_violation;

/// Repository for book persistence, deduplicated by source URL.
#[derive(Clone)]
pub struct BookRepository {
    pool: Pool<Postgres>,
}

impl BookRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists_by_url(&self, url: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM books WHERE url = $1)")
            .bind(url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// Insert a new book.
    ///
    /// Fails with [`AppError::Duplicate`] when the URL is already stored.
    /// The constraint, not this code, is what keeps concurrent crawls from
    /// duplicating a book — callers treat the error as a benign skip.
    pub async fn save(&self, book: &NewBook) -> Result<Book, AppError> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            INSERT INTO books
                (title, price, upc, product_type, availability,
                 number_of_reviews, description, url, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, price, upc, product_type, availability,
                      number_of_reviews, description, url, category_id, created_at
            "#,
        )
        .bind(&book.title)
        .bind(book.price)
        .bind(&book.upc)
        .bind(&book.product_type)
        .bind(&book.availability)
        .bind(book.number_of_reviews)
        .bind(&book.description)
        .bind(&book.url)
        .bind(book.category_id)
        .fetch_one(&self.pool)
        .await;

        match row {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation(&e) => Err(AppError::Duplicate(book.url.clone())),
            Err(e) => Err(AppError::DatabaseError(e.to_string())),
        }
    }

    /// Stored books as flattened records (category name joined in),
    /// optionally filtered by category name, in insertion order.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<BookRecord>, AppError> {
        let rows = sqlx::query_as::<_, BookRecordRow>(
            r#"
            SELECT b.id, b.title, b.price, b.upc, b.product_type, b.availability,
                   b.number_of_reviews, b.description, b.url,
                   c.name AS category_name, b.created_at
            FROM books b
            JOIN categories c ON c.id = b.category_id
            WHERE $1::varchar IS NULL OR c.name = $1
            ORDER BY b.created_at, b.url
            "#,
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn count(&self, category: Option<&str>) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM books b
            JOIN categories c ON c.id = b.category_id
            WHERE $1::varchar IS NULL OR c.name = $1
            "#,
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

// -- Internal row types for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    price: Option<Decimal>,
    upc: Option<String>,
    product_type: Option<String>,
    availability: Option<String>,
    number_of_reviews: Option<i32>,
    description: Option<String>,
    url: String,
    category_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            price: row.price,
            upc: row.upc,
            product_type: row.product_type,
            availability: row.availability,
            number_of_reviews: row.number_of_reviews,
            description: row.description,
            url: row.url,
            category_id: row.category_id,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookRecordRow {
    id: Uuid,
    title: String,
    price: Option<Decimal>,
    upc: Option<String>,
    product_type: Option<String>,
    availability: Option<String>,
    number_of_reviews: Option<i32>,
    description: Option<String>,
    url: String,
    category_name: String,
    created_at: DateTime<Utc>,
}

impl From<BookRecordRow> for BookRecord {
    fn from(row: BookRecordRow) -> Self {
        BookRecord {
            id: row.id,
            title: row.title,
            price: row.price,
            upc: row.upc,
            product_type: row.product_type,
            availability: row.availability,
            number_of_reviews: row.number_of_reviews,
            description: row.description,
            url: row.url,
            category_name: row.category_name,
            created_at: row.created_at,
        }
    }
}

// -- Trait implementation --

impl biblio_core::traits::BookStore for BookRepository {
    async fn exists_by_url(&self, url: &str) -> Result<bool, AppError> {
        BookRepository::exists_by_url(self, url).await
    }

    async fn save(&self, book: &NewBook) -> Result<Book, AppError> {
        BookRepository::save(self, book).await
    }

    async fn list(&self, category: Option<&str>) -> Result<Vec<BookRecord>, AppError> {
        BookRepository::list(self, category).await
    }

    async fn count(&self, category: Option<&str>) -> Result<i64, AppError> {
        BookRepository::count(self, category).await
    }
}
