use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::{CreateOrderRecordRequest, UpdateOrderRecordRequest},
    model::order::Order as OrderModel,
};
use shared::{config::ConnectionPool, errors::RepositoryError};

use async_trait::async_trait;
use tracing::{error, info};

pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, OrderModel>(
            r#"
            INSERT INTO orders (merchant_id, cashier_id, total_price, created_at, updated_at)
            VALUES ($1, $2, 0, current_timestamp, current_timestamp)
            RETURNING order_id, merchant_id, cashier_id, total_price, created_at, updated_at, deleted_at
            "#,
        )
        .bind(req.merchant_id)
        .bind(req.cashier_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to create order for merchant {} / cashier {}: {:?}",
                req.merchant_id, req.cashier_id, err
            );
            RepositoryError::from(err)
        })?;

        info!(
            "✅ Created order ID {} for merchant {}",
            result.order_id, result.merchant_id
        );
        Ok(result)
    }

    async fn update_order(
        &self,
        req: &UpdateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, OrderModel>(
            r#"
            UPDATE orders
            SET total_price = $2,
                updated_at  = current_timestamp
            WHERE order_id = $1
            RETURNING order_id, merchant_id, cashier_id, total_price, created_at, updated_at, deleted_at
            "#,
        )
        .bind(req.order_id)
        .bind(req.total_price)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!("❌ Failed to update order ID {}: {:?}", req.order_id, err);
            RepositoryError::from(err)
        })?
        .ok_or(RepositoryError::NotFound)?;

        info!(
            "🔄 Updated order ID {} total to {}",
            result.order_id, result.total_price
        );
        Ok(result)
    }

    async fn trash_order(&self, order_id: i32) -> Result<OrderModel, RepositoryError> {
        info!("🗑️ Trashing order: {}", order_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderModel>(
            r#"
            UPDATE orders
            SET deleted_at = current_timestamp
            WHERE order_id = $1 AND deleted_at IS NULL
            RETURNING order_id, merchant_id, cashier_id, total_price, created_at, updated_at, deleted_at
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to trash order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)
    }

    async fn restore_order(&self, order_id: i32) -> Result<OrderModel, RepositoryError> {
        info!("🔄 Restoring order: {}", order_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, OrderModel>(
            r#"
            UPDATE orders
            SET deleted_at = NULL
            WHERE order_id = $1 AND deleted_at IS NOT NULL
            RETURNING order_id, merchant_id, cashier_id, total_price, created_at, updated_at, deleted_at
            "#,
        )
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to restore order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?
        .ok_or(RepositoryError::NotFound)
    }

    async fn delete_order_permanent(&self, order_id: i32) -> Result<bool, RepositoryError> {
        info!("❌ Hard deleting order: {}", order_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            DELETE FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to delete order {}: {:?}", order_id, e);
            RepositoryError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(true)
    }

    async fn restore_all_order(&self) -> Result<bool, RepositoryError> {
        info!("🔄 Restoring all trashed orders");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET deleted_at = NULL WHERE deleted_at IS NOT NULL
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to restore all orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!("✅ Restored {} orders", result.rows_affected());
        Ok(true)
    }

    async fn delete_all_order_permanent(&self) -> Result<bool, RepositoryError> {
        info!("❌ Hard deleting all trashed orders");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            DELETE FROM orders WHERE deleted_at IS NOT NULL
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to delete all trashed orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!("✅ Deleted {} trashed orders", result.rows_affected());
        Ok(true)
    }
}
