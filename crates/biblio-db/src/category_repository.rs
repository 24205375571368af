use biblio_core::error::AppError;
use biblio_core::models::Category;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use crate::is_unique_violation;

/// Repository for category persistence, deduplicated by name.
#[derive(Clone)]
pub struct CategoryRepository {
    pool: Pool<Postgres>,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the category with this name, creating it first if absent.
    ///
    /// Two crawls can race here; the name's uniqueness constraint decides
    /// the winner and the loser re-reads the stored row.
    pub async fn find_or_create(&self, name: &str) -> Result<Category, AppError> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => {
                tracing::info!(category = %name, "Created category");
                Ok(row.into())
            }
            Err(e) if is_unique_violation(&e) => {
                self.find_by_name(name).await?.ok_or_else(|| {
                    AppError::DatabaseError(format!(
                        "category '{name}' vanished after unique violation"
                    ))
                })
            }
            Err(e) => Err(AppError::DatabaseError(e.to_string())),
        }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, created_at
            FROM categories
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    /// All categories in insertion order.
    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, created_at
            FROM categories
            ORDER BY created_at, name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

// -- Trait implementation --

impl biblio_core::traits::CategoryStore for CategoryRepository {
    async fn find_or_create(&self, name: &str) -> Result<Category, AppError> {
        CategoryRepository::find_or_create(self, name).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        CategoryRepository::find_by_name(self, name).await
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        CategoryRepository::list(self).await
    }

    async fn count(&self) -> Result<i64, AppError> {
        CategoryRepository::count(self).await
    }
}
