use biblio_core::AppError;
use biblio_core::models::NewBook;
use biblio_db::{BookRepository, CategoryRepository};
use uuid::Uuid;

use crate::integration::common::setup_test_db;

fn sample_book(url: &str, title: &str, category_id: Uuid) -> NewBook {
    NewBook {
        title: title.to_string(),
        price: Some("45.17".parse().unwrap()),
        upc: Some("a22124811bfa8350".to_string()),
        product_type: Some("Books".to_string()),
        availability: Some("In stock (19 available)".to_string()),
        number_of_reviews: Some(0),
        description: Some("A long description.".to_string()),
        url: url.to_string(),
        category_id,
    }
}

#[tokio::test]
async fn save_then_exists_by_url() {
    let (pool, _container) = setup_test_db().await;
    let categories = CategoryRepository::new(pool.clone());
    let books = BookRepository::new(pool);

    let travel = categories.find_or_create("Travel").await.unwrap();
    let url = "https://books.toscrape.com/catalogue/b_1/index.html";

    assert!(!books.exists_by_url(url).await.unwrap());

    let saved = books.save(&sample_book(url, "Book One", travel.id)).await.unwrap();
    assert_eq!(saved.title, "Book One");
    assert_eq!(saved.price, Some("45.17".parse().unwrap()));
    assert_eq!(saved.category_id, travel.id);

    assert!(books.exists_by_url(url).await.unwrap());
}

#[tokio::test]
async fn saving_the_same_url_twice_is_a_duplicate() {
    let (pool, _container) = setup_test_db().await;
    let categories = CategoryRepository::new(pool.clone());
    let books = BookRepository::new(pool);

    let travel = categories.find_or_create("Travel").await.unwrap();
    let url = "https://books.toscrape.com/catalogue/b_1/index.html";

    books.save(&sample_book(url, "First", travel.id)).await.unwrap();
    let err = books
        .save(&sample_book(url, "Second", travel.id))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Duplicate(_)));
    assert_eq!(books.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn book_with_empty_optional_fields_round_trips() {
    let (pool, _container) = setup_test_db().await;
    let categories = CategoryRepository::new(pool.clone());
    let books = BookRepository::new(pool);

    let travel = categories.find_or_create("Travel").await.unwrap();
    let book = NewBook {
        title: "Sparse".to_string(),
        price: None,
        upc: None,
        product_type: None,
        availability: None,
        number_of_reviews: None,
        description: None,
        url: "https://books.toscrape.com/catalogue/sparse_1/index.html".to_string(),
        category_id: travel.id,
    };

    let saved = books.save(&book).await.unwrap();
    assert!(saved.price.is_none());
    assert!(saved.number_of_reviews.is_none());
    assert!(saved.description.is_none());
}

#[tokio::test]
async fn list_flattens_the_category_name() {
    let (pool, _container) = setup_test_db().await;
    let categories = CategoryRepository::new(pool.clone());
    let books = BookRepository::new(pool);

    let travel = categories.find_or_create("Travel").await.unwrap();
    books
        .save(&sample_book(
            "https://books.toscrape.com/catalogue/b_1/index.html",
            "Book One",
            travel.id,
        ))
        .await
        .unwrap();

    let records = books.list(None).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category_name, "Travel");
    assert_eq!(records[0].title, "Book One");
}

#[tokio::test]
async fn list_and_count_filter_by_category() {
    let (pool, _container) = setup_test_db().await;
    let categories = CategoryRepository::new(pool.clone());
    let books = BookRepository::new(pool);

    let travel = categories.find_or_create("Travel").await.unwrap();
    let mystery = categories.find_or_create("Mystery").await.unwrap();

    books
        .save(&sample_book(
            "https://books.toscrape.com/catalogue/t_1/index.html",
            "Travel One",
            travel.id,
        ))
        .await
        .unwrap();
    books
        .save(&sample_book(
            "https://books.toscrape.com/catalogue/m_1/index.html",
            "Mystery One",
            mystery.id,
        ))
        .await
        .unwrap();
    books
        .save(&sample_book(
            "https://books.toscrape.com/catalogue/m_2/index.html",
            "Mystery Two",
            mystery.id,
        ))
        .await
        .unwrap();

    assert_eq!(books.count(None).await.unwrap(), 3);
    assert_eq!(books.count(Some("Mystery")).await.unwrap(), 2);
    assert_eq!(books.count(Some("Travel")).await.unwrap(), 1);
    assert_eq!(books.count(Some("Never Crawled")).await.unwrap(), 0);

    let mysteries = books.list(Some("Mystery")).await.unwrap();
    assert_eq!(mysteries.len(), 2);
    assert!(mysteries.iter().all(|b| b.category_name == "Mystery"));
}
