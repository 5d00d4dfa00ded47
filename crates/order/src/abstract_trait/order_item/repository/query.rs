use crate::model::order_item::OrderItem as OrderItemModel;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderItemQueryRepository = Arc<dyn OrderItemQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderItemQueryRepositoryTrait {
    /// All items of the order, trashed ones included.
    async fn find_order_item_by_order(
        &self,
        order_id: i32,
    ) -> Result<Vec<OrderItemModel>, RepositoryError>;

    /// Sum of `quantity * price` over the order's active items.
    async fn calculate_total_price(&self, order_id: i32) -> Result<i32, RepositoryError>;
}
