use async_trait::async_trait;
use sqlx::PgPool;

use super::ProductGateway;
use crate::error::{AppError, AppResult};
use crate::models::{NewProduct, Product};

pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Unique violations become a `Conflict`; everything else stays a database error.
fn map_write_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Product name already exists".to_string())
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl ProductGateway for PgGateway {
    async fn insert(&self, product: &NewProduct) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, inventory)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, inventory
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.inventory)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn fetch_all(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, inventory FROM products ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, inventory FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn update(&self, product: &Product) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name        = $1,
                description = $2,
                price       = $3,
                inventory   = $4
            WHERE id = $5
            RETURNING id, name, description, price, inventory
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.inventory)
        .bind(product.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
