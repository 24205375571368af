use biblio_db::CategoryRepository;

use crate::integration::common::setup_test_db;

#[tokio::test]
async fn find_or_create_creates_then_returns_existing() {
    let (pool, _container) = setup_test_db().await;
    let repo = CategoryRepository::new(pool);

    let created = repo.find_or_create("Travel").await.unwrap();
    assert_eq!(created.name, "Travel");

    let again = repo.find_or_create("Travel").await.unwrap();
    assert_eq!(again.id, created.id);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn category_names_are_case_sensitive() {
    let (pool, _container) = setup_test_db().await;
    let repo = CategoryRepository::new(pool);

    let upper = repo.find_or_create("Poetry").await.unwrap();
    let lower = repo.find_or_create("poetry").await.unwrap();
    assert_ne!(upper.id, lower.id);
    assert_eq!(repo.count().await.unwrap(), 2);
}

#[tokio::test]
async fn find_by_name_returns_none_for_unknown() {
    let (pool, _container) = setup_test_db().await;
    let repo = CategoryRepository::new(pool);

    assert!(repo.find_by_name("Never Crawled").await.unwrap().is_none());
}

#[tokio::test]
async fn list_preserves_insertion_order() {
    let (pool, _container) = setup_test_db().await;
    let repo = CategoryRepository::new(pool);

    for name in ["Travel", "Mystery", "Poetry"] {
        repo.find_or_create(name).await.unwrap();
        // Distinct created_at timestamps keep the order deterministic.
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let listed = repo.list().await.unwrap();
    let names: Vec<_> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Travel", "Mystery", "Poetry"]);
}
