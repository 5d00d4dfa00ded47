use crate::{
    abstract_trait::order_item::repository::OrderItemQueryRepositoryTrait,
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderItemQueryRepository {
    db: ConnectionPool,
}

impl OrderItemQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderItemQueryRepositoryTrait for OrderItemQueryRepository {
    async fn find_order_item_by_order(
        &self,
        order_id: i32,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        info!("📦 Fetching order items for order_id: {}", order_id);

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        sqlx::query_as::<_, OrderItemModel>(
            r#"
            SELECT
                order_item_id,
                order_id,
                product_id,
                quantity,
                price,
                created_at,
                updated_at,
                deleted_at
            FROM order_items
            WHERE order_id = $1
            ORDER BY order_item_id ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to fetch order items for order_id {}: {:?}",
                order_id, e
            );
            RepositoryError::from(e)
        })
    }

    async fn calculate_total_price(&self, order_id: i32) -> Result<i32, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let total: i32 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity * price), 0)::int AS total_price
            FROM order_items
            WHERE order_id = $1
              AND deleted_at IS NULL
            "#,
        )
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to calculate total for order_id {}: {:?}",
                order_id, e
            );
            RepositoryError::from(e)
        })?;

        Ok(total)
    }
}
