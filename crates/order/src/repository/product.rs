use crate::{
    abstract_trait::product::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
    domain::requests::product::UpdateProductStockRequest,
    model::product::Product,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_by_id(&self, product_id: i32) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, merchant_id, name, price, count_in_stock,
                   created_at, updated_at, deleted_at
            FROM products
            WHERE product_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {}: {:?}", product_id, e);
            RepositoryError::from(e)
        })
    }
}

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn update_count_stock(
        &self,
        req: &UpdateProductStockRequest,
    ) -> Result<Product, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET count_in_stock = $3,
                updated_at     = current_timestamp
            WHERE product_id = $1
              AND count_in_stock = $2
              AND deleted_at IS NULL
            RETURNING product_id, merchant_id, name, price, count_in_stock,
                      created_at, updated_at, deleted_at
            "#,
        )
        .bind(req.product_id)
        .bind(req.expected_count)
        .bind(req.count_in_stock)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to update stock of product {}: {:?}",
                req.product_id, e
            );
            RepositoryError::from(e)
        })?;

        match updated {
            Some(product) => {
                info!(
                    "📦 Stock of product {} set {} -> {}",
                    product.product_id, req.expected_count, product.count_in_stock
                );
                Ok(product)
            }
            None => {
                warn!(
                    "⚠️ Stock of product {} no longer equals {}",
                    req.product_id, req.expected_count
                );
                Err(RepositoryError::Conflict(format!(
                    "stock of product {} changed",
                    req.product_id
                )))
            }
        }
    }
}
