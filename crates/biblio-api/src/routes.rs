use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use biblio_client::ReqwestFetcher;
use biblio_core::CrawlService;
use biblio_core::error::AppError;

use crate::dto::{
    BookListQuery, BookListResponse, BookResponse, CategoryListResponse, CategoryResponse,
    CountResponse, CrawlAllResponse, CrawlBooksResponse, CrawlCategoriesResponse, ErrorResponse,
    HealthResponse, StatusResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/status", get(status))
        .route("/v1/categories/crawl", post(crawl_categories))
        .route("/v1/categories", get(list_categories))
        .route("/v1/categories/count", get(count_categories))
        .route("/v1/categories/{name}", get(get_category))
        .route("/v1/books/crawl", post(crawl_all_books))
        .route("/v1/books/crawl/{category}", post(crawl_category_books))
        .route("/v1/books", get(list_books))
        .route("/v1/books/count", get(count_books))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

/// Crawl pipeline wired to this request's state. Built per call like the
/// repositories are — every component is cheap to construct.
fn crawl_service(
    state: &AppState,
) -> Result<
    CrawlService<ReqwestFetcher, biblio_db::CategoryRepository, biblio_db::BookRepository>,
    AppError,
> {
    let fetcher = ReqwestFetcher::new()?;
    Ok(CrawlService::new(
        fetcher,
        state.db.category_repo(),
        state.db.book_repo(),
        state.pacing.clone(),
    ))
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/v1/categories/crawl",
    responses(
        (status = 200, description = "Categories crawled", body = CrawlCategoriesResponse),
        (status = 502, description = "Fetch failed", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn crawl_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let service = crawl_service(&state)?;
    let categories = service.crawl_categories().await?;

    let response = CrawlCategoriesResponse {
        count: categories.len(),
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    };

    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/v1/categories",
    responses(
        (status = 200, description = "Stored categories", body = CategoryListResponse),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state.db.category_repo().list().await?;

    let response = CategoryListResponse {
        count: categories.len(),
        categories: categories.into_iter().map(CategoryResponse::from).collect(),
    };

    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/v1/categories/count",
    responses(
        (status = 200, description = "Category count", body = CountResponse),
    ),
    tag = "categories"
)]
pub async fn count_categories(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.db.category_repo().count().await?;
    Ok(axum::Json(CountResponse {
        category: None,
        count,
    }))
}

#[utoipa::path(
    get,
    path = "/v1/categories/{name}",
    params(
        ("name" = String, Path, description = "Category name (case-sensitive)")
    ),
    responses(
        (status = 200, description = "Category details", body = CategoryResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.db.category_repo().find_by_name(&name).await?;

    match category {
        Some(category) => Ok(axum::Json(CategoryResponse::from(category)).into_response()),
        None => {
            let body = ErrorResponse {
                error: "not_found".to_string(),
                message: format!("Category not found: {name}"),
            };
            Ok((StatusCode::NOT_FOUND, axum::Json(body)).into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/v1/books/crawl/{category}",
    params(
        ("category" = String, Path, description = "Category name (case-sensitive)")
    ),
    responses(
        (status = 200, description = "Books crawled", body = CrawlBooksResponse),
        (status = 400, description = "Unknown category", body = ErrorResponse),
        (status = 502, description = "Fetch failed", body = ErrorResponse),
    ),
    tag = "books"
)]
pub async fn crawl_category_books(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let service = crawl_service(&state)?;

    match service.crawl_category(&category).await {
        Ok(books) => {
            let response = CrawlBooksResponse {
                category,
                count: books.len(),
            };
            Ok(axum::Json(response).into_response())
        }
        // Crawling an uncrawled category is a request error, not a lookup miss.
        Err(AppError::NotFound(message)) => {
            let body = ErrorResponse {
                error: "bad_request".to_string(),
                message,
            };
            Ok((StatusCode::BAD_REQUEST, axum::Json(body)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[utoipa::path(
    post,
    path = "/v1/books/crawl",
    responses(
        (status = 200, description = "Full crawl finished", body = CrawlAllResponse),
        (status = 502, description = "Fetch failed", body = ErrorResponse),
    ),
    tag = "books"
)]
pub async fn crawl_all_books(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let service = crawl_service(&state)?;

    // No external interrupt source over HTTP; the token exists so the
    // orchestrator's pause stays cancellable.
    let cancel = CancellationToken::new();
    let books = service.crawl_all(&cancel).await?;

    Ok(axum::Json(CrawlAllResponse { count: books.len() }))
}

#[utoipa::path(
    get,
    path = "/v1/books",
    params(BookListQuery),
    responses(
        (status = 200, description = "Stored books", body = BookListResponse),
    ),
    tag = "books"
)]
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = state
        .db
        .book_repo()
        .list(query.category.as_deref())
        .await?;

    let response = BookListResponse {
        count: records.len(),
        books: records.into_iter().map(BookResponse::from).collect(),
    };

    Ok(axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/v1/books/count",
    params(BookListQuery),
    responses(
        (status = 200, description = "Book count", body = CountResponse),
    ),
    tag = "books"
)]
pub async fn count_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let count = state.db.book_repo().count(query.category.as_deref()).await?;
    Ok(axum::Json(CountResponse {
        category: query.category,
        count,
    }))
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_status = match state.db.health_check().await {
        Ok(()) => "ok",
        Err(_) => "error",
    };

    let status = if db_status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if db_status == "ok" {
            "healthy"
        } else {
            "unhealthy"
        },
        database: db_status,
    };

    (status, axum::Json(response))
}

#[utoipa::path(
    get,
    path = "/v1/status",
    responses(
        (status = 200, description = "Crawl totals", body = StatusResponse),
    ),
    tag = "system"
)]
pub async fn status(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let total_categories = state.db.category_repo().count().await?;
    let total_books = state.db.book_repo().count(None).await?;

    Ok(axum::Json(StatusResponse {
        status: "running",
        total_categories,
        total_books,
    }))
}
