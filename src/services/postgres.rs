use crate::models::{Category, CategoryPayload, CategoryWithProducts, Product, ProductPayload};
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the catalog database
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

/// PostgreSQL-backed catalog store
///
/// Owns the products and categories tables. Products are always read joined
/// with their category; category reads include the derived product
/// collection.
pub struct CatalogStore {
    pool: PgPool,
}

impl CatalogStore {
    /// Create a new catalog store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new catalog store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, CatalogError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }

    /// Fetch the entire product catalog, each product joined with its category
    ///
    /// This is the snapshot read used by both the product listing and the
    /// search pipeline. No pagination and no size cap.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let query = r#"
            SELECT p.id, p.name, p.description, p.price, p.image_url, p.category_id,
                   p.attributes, p.created_at, p.updated_at,
                   c.name AS category_name, c.description AS category_description,
                   c.created_at AS category_created_at, c.updated_at AS category_updated_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            ORDER BY p.id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        let products = rows.iter().map(product_with_category_from_row).collect();

        Ok(products)
    }

    /// Fetch a single product by id, joined with its category
    pub async fn get_product(&self, id: i32) -> Result<Option<Product>, CatalogError> {
        let query = r#"
            SELECT p.id, p.name, p.description, p.price, p.image_url, p.category_id,
                   p.attributes, p.created_at, p.updated_at,
                   c.name AS category_name, c.description AS category_description,
                   c.created_at AS category_created_at, c.updated_at AS category_updated_at
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(product_with_category_from_row))
    }

    /// Create a product and return it joined with its category
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<Product, CatalogError> {
        let query = r#"
            INSERT INTO products (name, description, price, image_url, category_id, attributes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(payload.price)
            .bind(&payload.image_url)
            .bind(payload.category_id)
            .bind(&payload.attributes)
            .fetch_one(&self.pool)
            .await?;

        let id: i32 = row.get("id");

        tracing::debug!("Created product {} ({})", id, payload.name);

        self.get_product(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Product {} not found", id)))
    }

    /// Replace a product's fields and return the updated record
    pub async fn update_product(
        &self,
        id: i32,
        payload: &ProductPayload,
    ) -> Result<Product, CatalogError> {
        let query = r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, image_url = $5,
                category_id = $6, attributes = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(id)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(payload.price)
            .bind(&payload.image_url)
            .bind(payload.category_id)
            .bind(&payload.attributes)
            .fetch_optional(&self.pool)
            .await?;

        if row.is_none() {
            return Err(CatalogError::NotFound(format!("Product {} not found", id)));
        }

        self.get_product(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Product {} not found", id)))
    }

    /// Delete a product by id
    pub async fn delete_product(&self, id: i32) -> Result<(), CatalogError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::NotFound(format!("Product {} not found", id)));
        }

        tracing::debug!("Deleted product {}", id);

        Ok(())
    }

    /// Fetch all categories, each with its associated products
    pub async fn list_categories(&self) -> Result<Vec<CategoryWithProducts>, CatalogError> {
        let category_rows = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let product_rows = sqlx::query(
            r#"
            SELECT id, name, description, price, image_url, category_id,
                   attributes, created_at, updated_at
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // Group products by category in one pass instead of a query per category
        let mut by_category: HashMap<i32, Vec<Product>> = HashMap::new();
        for row in &product_rows {
            let product = product_from_row(row);
            by_category.entry(product.category_id).or_default().push(product);
        }

        let categories = category_rows
            .iter()
            .map(|row| {
                let id: i32 = row.get("id");
                CategoryWithProducts {
                    id,
                    name: row.get("name"),
                    description: row.get("description"),
                    created_at: row.get("created_at"),
                    updated_at: row.get("updated_at"),
                    products: by_category.remove(&id).unwrap_or_default(),
                }
            })
            .collect();

        Ok(categories)
    }

    /// Fetch a single category with its associated products
    pub async fn get_category(
        &self,
        id: i32,
    ) -> Result<Option<CategoryWithProducts>, CatalogError> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let products = self.products_in_category(id).await?;

        Ok(Some(CategoryWithProducts {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            products,
        }))
    }

    /// Create a category and return it with its (empty) product collection
    pub async fn create_category(
        &self,
        payload: &CategoryPayload,
    ) -> Result<CategoryWithProducts, CatalogError> {
        let row = sqlx::query(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Created category {} ({})", row.get::<i32, _>("id"), payload.name);

        Ok(CategoryWithProducts {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            products: Vec::new(),
        })
    }

    /// Replace a category's fields and return the updated record
    pub async fn update_category(
        &self,
        id: i32,
        payload: &CategoryPayload,
    ) -> Result<CategoryWithProducts, CatalogError> {
        let row = sqlx::query(
            r#"
            UPDATE categories
            SET name = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.description)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_none() {
            return Err(CatalogError::NotFound(format!("Category {} not found", id)));
        }

        self.get_category(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category by id
    ///
    /// Refused while any product still references the category; the rejection
    /// leaves the category and its products unchanged.
    pub async fn delete_category(&self, id: i32) -> Result<(), CatalogError> {
        let exists = sqlx::query("SELECT id FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(CatalogError::NotFound(format!("Category {} not found", id)));
        }

        let row = sqlx::query("SELECT COUNT(*) AS product_count FROM products WHERE category_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        let product_count: i64 = row.get("product_count");
        if product_count > 0 {
            return Err(CatalogError::Conflict(
                "Cannot delete category with associated products".to_string(),
            ));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Deleted category {}", id);

        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, CatalogError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    async fn products_in_category(&self, category_id: i32) -> Result<Vec<Product>, CatalogError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, image_url, category_id,
                   attributes, created_at, updated_at
            FROM products
            WHERE category_id = $1
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }
}

/// Map a bare products row (no category columns) to a Product
fn product_from_row(row: &PgRow) -> Product {
    Product {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        image_url: row.get("image_url"),
        category_id: row.get("category_id"),
        attributes: row.get::<Option<Value>, _>("attributes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        category: None,
    }
}

/// Map a joined products/categories row to a Product with its category
fn product_with_category_from_row(row: &PgRow) -> Product {
    let category_id: i32 = row.get("category_id");

    Product {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get("price"),
        image_url: row.get("image_url"),
        category_id,
        attributes: row.get::<Option<Value>, _>("attributes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        category: Some(Category {
            id: category_id,
            name: row.get("category_name"),
            description: row.get("category_description"),
            created_at: row.get("category_created_at"),
            updated_at: row.get("category_updated_at"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error_message() {
        let err = CatalogError::NotFound("Product 7 not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product 7 not found");
    }

    #[test]
    fn test_conflict_error_message() {
        let err = CatalogError::Conflict("Cannot delete category with associated products".to_string());
        assert!(err.to_string().contains("associated products"));
    }
}
