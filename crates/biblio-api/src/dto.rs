use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use biblio_core::models::{BookRecord, Category};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CategoryListResponse {
    pub count: usize,
    pub categories: Vec<CategoryResponse>,
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

/// A stored book with the category reference flattened to its name.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub upc: Option<String>,
    pub product_type: Option<String>,
    pub availability: Option<String>,
    pub number_of_reviews: Option<i32>,
    pub description: Option<String>,
    pub url: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookRecord> for BookResponse {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            price: record.price,
            upc: record.upc,
            product_type: record.product_type,
            availability: record.availability,
            number_of_reviews: record.number_of_reviews,
            description: record.description,
            url: record.url,
            category: record.category_name,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BookListQuery {
    /// Restrict to a single category name.
    pub category: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BookListResponse {
    pub count: usize,
    pub books: Vec<BookResponse>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CountResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Crawl operations
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CrawlCategoriesResponse {
    pub count: usize,
    pub categories: Vec<CategoryResponse>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CrawlBooksResponse {
    pub category: String,
    /// Books newly created by this crawl; previously stored books are
    /// skipped and not counted.
    pub count: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CrawlAllResponse {
    /// Books newly created across all categories.
    pub count: usize,
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    pub status: &'static str,
    pub total_categories: i64,
    pub total_books: i64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
