use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A book category discovered in the site's navigation.
///
/// Identity is the case-sensitive name; a category is created once on first
/// sight and never updated or deleted afterwards.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A stored book. Identity is the canonical source URL.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    /// Absent when the price text on the detail page was unparsable.
    pub price: Option<Decimal>,
    pub upc: Option<String>,
    pub product_type: Option<String>,
    pub availability: Option<String>,
    pub number_of_reviews: Option<i32>,
    pub description: Option<String>,
    pub url: String,
    /// The owning category, set at creation and never reassigned.
    pub category_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// DTO for inserting a newly extracted book into the store.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NewBook {
    pub title: String,
    pub price: Option<Decimal>,
    pub upc: Option<String>,
    pub product_type: Option<String>,
    pub availability: Option<String>,
    pub number_of_reviews: Option<i32>,
    pub description: Option<String>,
    pub url: String,
    pub category_id: Uuid,
}

/// Flattened read model for boundary queries: the category reference is
/// replaced by the category name.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub price: Option<Decimal>,
    pub upc: Option<String>,
    pub product_type: Option<String>,
    pub availability: Option<String>,
    pub number_of_reviews: Option<i32>,
    pub description: Option<String>,
    pub url: String,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
}
