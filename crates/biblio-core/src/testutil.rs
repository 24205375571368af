//! Test utilities: mock implementations of the core traits and HTML
//! builders for the fixed page layout.
//!
//! Handwritten mocks for dependency injection in unit tests. The mocks use
//! `Arc<Mutex<_>>` for interior mutability so tests can assert on recorded
//! calls and stored state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Book, BookRecord, Category, NewBook};
use crate::traits::{BookStore, CategoryStore, Fetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

enum RouteResponse {
    Html(String),
    TransportError(String),
}

/// Mock fetcher that serves a fixed URL→response map.
///
/// Unrouted URLs answer like a real 404 so a crawl that wanders off the
/// configured site fails visibly. Every fetched URL is recorded.
#[derive(Clone, Default)]
pub struct MockFetcher {
    routes: Arc<Mutex<HashMap<String, RouteResponse>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn route(self, url: &str, html: &str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), RouteResponse::Html(html.to_string()));
        self
    }

    /// Fail `url` with a transport error.
    pub fn route_error(self, url: &str, message: &str) -> Self {
        self.routes.lock().unwrap().insert(
            url.to_string(),
            RouteResponse::TransportError(message.to_string()),
        );
        self
    }

    /// Every URL fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.routes.lock().unwrap().get(url) {
            Some(RouteResponse::Html(html)) => Ok(html.clone()),
            Some(RouteResponse::TransportError(message)) => {
                Err(AppError::NetworkError(message.clone()))
            }
            None => Err(AppError::HttpError(format!("HTTP 404 for {url}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryCategoryStore
// ---------------------------------------------------------------------------

/// In-memory category store with name-keyed dedup.
#[derive(Clone, Default)]
pub struct MemoryCategoryStore {
    categories: Arc<Mutex<Vec<Category>>>,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name_of(&self, id: Uuid) -> Option<String> {
        self.categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.clone())
    }
}

impl CategoryStore for MemoryCategoryStore {
    async fn find_or_create(&self, name: &str) -> Result<Category, AppError> {
        let mut categories = self.categories.lock().unwrap();
        if let Some(existing) = categories.iter().find(|c| c.name == name) {
            return Ok(existing.clone());
        }
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        categories.push(category.clone());
        Ok(category)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.categories.lock().unwrap().len() as i64)
    }
}

// ---------------------------------------------------------------------------
// MemoryBookStore
// ---------------------------------------------------------------------------

/// In-memory book store with URL-keyed dedup.
///
/// Holds a handle to the category store so `list` can flatten category
/// names the way the SQL join does.
#[derive(Clone)]
pub struct MemoryBookStore {
    categories: MemoryCategoryStore,
    books: Arc<Mutex<Vec<Book>>>,
    blind_exists: bool,
}

impl MemoryBookStore {
    pub fn new(categories: MemoryCategoryStore) -> Self {
        Self {
            categories,
            books: Arc::new(Mutex::new(Vec::new())),
            blind_exists: false,
        }
    }

    /// Make `exists_by_url` always answer `false`, so every discovered URL
    /// goes through `save` — exercises the uniqueness constraint as the
    /// safety net for the check-then-save race.
    pub fn with_blind_exists(mut self) -> Self {
        self.blind_exists = true;
        self
    }

    /// Snapshot of stored books, in insertion order.
    pub fn stored(&self) -> Vec<Book> {
        self.books.lock().unwrap().clone()
    }
}

impl BookStore for MemoryBookStore {
    async fn exists_by_url(&self, url: &str) -> Result<bool, AppError> {
        if self.blind_exists {
            return Ok(false);
        }
        Ok(self.books.lock().unwrap().iter().any(|b| b.url == url))
    }

    async fn save(&self, book: &NewBook) -> Result<Book, AppError> {
        let mut books = self.books.lock().unwrap();
        if books.iter().any(|b| b.url == book.url) {
            return Err(AppError::Duplicate(book.url.clone()));
        }
        let stored = Book {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            price: book.price,
            upc: book.upc.clone(),
            product_type: book.product_type.clone(),
            availability: book.availability.clone(),
            number_of_reviews: book.number_of_reviews,
            description: book.description.clone(),
            url: book.url.clone(),
            category_id: book.category_id,
            created_at: Utc::now(),
        };
        books.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self, category: Option<&str>) -> Result<Vec<BookRecord>, AppError> {
        let books = self.books.lock().unwrap().clone();
        let mut records = Vec::new();
        for book in books {
            let category_name = self.categories.name_of(book.category_id).unwrap_or_default();
            if let Some(filter) = category {
                if category_name != filter {
                    continue;
                }
            }
            records.push(BookRecord {
                id: book.id,
                title: book.title,
                price: book.price,
                upc: book.upc,
                product_type: book.product_type,
                availability: book.availability,
                number_of_reviews: book.number_of_reviews,
                description: book.description,
                url: book.url,
                category_name,
                created_at: book.created_at,
            });
        }
        Ok(records)
    }

    async fn count(&self, category: Option<&str>) -> Result<i64, AppError> {
        Ok(self.list(category).await?.len() as i64)
    }
}

// ---------------------------------------------------------------------------
// HTML builders for the fixed page layout
// ---------------------------------------------------------------------------

/// Site root with a side-navigation category list.
pub fn root_page_html(categories: &[&str]) -> String {
    let links: String = categories
        .iter()
        .map(|name| format!(r#"<li><a href="catalogue/category/books/_/index.html">{name}</a></li>"#))
        .collect();
    format!(
        r#"<html><body>
        <div class="side_categories">
          <ul class="nav-list">
            <li><a href="catalogue/category/books_1/index.html">Books</a>
              <ul>{links}</ul>
            </li>
          </ul>
        </div>
        </body></html>"#
    )
}

/// A listing page with one item card per href and an optional next link.
pub fn listing_page_html(item_hrefs: &[&str], next_href: Option<&str>) -> String {
    let cards: String = item_hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<article class="product_pod"><h3><a href="{href}">a title</a></h3></article>"#
            )
        })
        .collect();
    let pager = next_href
        .map(|href| format!(r#"<ul class="pager"><li class="next"><a href="{href}">next</a></li></ul>"#))
        .unwrap_or_default();
    format!(r#"<html><body><section>{cards}{pager}</section></body></html>"#)
}

/// An item detail page with the product-information table.
pub fn detail_page_html(
    title: &str,
    price: Option<&str>,
    rows: &[(&str, &str)],
    description: Option<&str>,
) -> String {
    let price_html = price
        .map(|p| format!(r#"<p class="price_color">{p}</p>"#))
        .unwrap_or_default();
    let rows_html: String = rows
        .iter()
        .map(|(label, value)| format!(r#"<tr><th>{label}</th><td>{value}</td></tr>"#))
        .collect();
    let description_html = description
        .map(|text| format!(r#"<div id="product_description"></div><p>{text}</p>"#))
        .unwrap_or_default();
    format!(
        r#"<html><body><article class="product_page">
        <div class="product_main"><h1>{title}</h1>{price_html}</div>
        <table class="table table-striped">{rows_html}</table>
        {description_html}
        </article></body></html>"#
    )
}
