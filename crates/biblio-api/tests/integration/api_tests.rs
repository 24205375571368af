use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use biblio_core::models::NewBook;

use crate::integration::common::{TestApp, setup_test_app};

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Seed a category with one stored book, bypassing the crawler.
async fn seed_travel_book(app: &TestApp) {
    let travel = app
        .db
        .category_repo()
        .find_or_create("Travel")
        .await
        .unwrap();
    app.db
        .book_repo()
        .save(&NewBook {
            title: "It's Only the Himalayas".to_string(),
            price: Some("45.17".parse().unwrap()),
            upc: Some("a22124811bfa8350".to_string()),
            product_type: Some("Books".to_string()),
            availability: Some("In stock (19 available)".to_string()),
            number_of_reviews: Some(0),
            description: Some("Wherever you go, whatever you do...".to_string()),
            url: "https://books.toscrape.com/catalogue/its-only-the-himalayas_981/index.html"
                .to_string(),
            category_id: travel.id,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn health_returns_200() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "ok");
}

#[tokio::test]
async fn list_categories_starts_empty() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(Request::get("/v1/categories").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["categories"], serde_json::json!([]));
}

#[tokio::test]
async fn unknown_category_lookup_returns_404() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(
            Request::get("/v1/categories/Nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn crawling_an_unknown_category_returns_400() {
    let app = setup_test_app().await;

    let response = app
        .router
        .oneshot(
            Request::post("/v1/books/crawl/Nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn stored_category_is_retrievable_by_name() {
    let app = setup_test_app().await;
    seed_travel_book(&app).await;

    let response = app
        .router
        .oneshot(
            Request::get("/v1/categories/Travel")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Travel");
}

#[tokio::test]
async fn list_books_flattens_category_name() {
    let app = setup_test_app().await;
    seed_travel_book(&app).await;

    let response = app
        .router
        .oneshot(Request::get("/v1/books").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["books"][0]["title"], "It's Only the Himalayas");
    assert_eq!(json["books"][0]["category"], "Travel");
    assert_eq!(json["books"][0]["price"], "45.17");
}

#[tokio::test]
async fn list_books_filters_by_category() {
    let app = setup_test_app().await;
    seed_travel_book(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/v1/books?category=Travel")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);

    let response = app
        .router
        .oneshot(
            Request::get("/v1/books?category=Mystery")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["count"], 0);
    assert_eq!(json["books"], serde_json::json!([]));
}

#[tokio::test]
async fn count_endpoints_report_totals() {
    let app = setup_test_app().await;
    seed_travel_book(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/v1/books/count?category=Travel")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["category"], "Travel");

    let response = app
        .router
        .oneshot(
            Request::get("/v1/categories/count")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn status_reports_running_totals() {
    let app = setup_test_app().await;
    seed_travel_book(&app).await;

    let response = app
        .router
        .oneshot(Request::get("/v1/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "running");
    assert_eq!(json["total_categories"], 1);
    assert_eq!(json["total_books"], 1);
}
