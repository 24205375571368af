use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblio API",
        version = "0.2.0",
        description = "Catalogue crawler for a fixed book site: crawl, list, and count stored records."
    ),
    paths(
        crate::routes::crawl_categories,
        crate::routes::list_categories,
        crate::routes::count_categories,
        crate::routes::get_category,
        crate::routes::crawl_category_books,
        crate::routes::crawl_all_books,
        crate::routes::list_books,
        crate::routes::count_books,
        crate::routes::health,
        crate::routes::status,
    ),
    components(schemas(
        crate::dto::CategoryResponse,
        crate::dto::CategoryListResponse,
        crate::dto::BookResponse,
        crate::dto::BookListResponse,
        crate::dto::CountResponse,
        crate::dto::CrawlCategoriesResponse,
        crate::dto::CrawlBooksResponse,
        crate::dto::CrawlAllResponse,
        crate::dto::HealthResponse,
        crate::dto::StatusResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "categories", description = "Category discovery and lookup"),
        (name = "books", description = "Book crawling and queries"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
