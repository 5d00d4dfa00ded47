use crate::domain::response::{api::ApiResponse, order_item::OrderItemResponse};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynOrderItemQueryService = Arc<dyn OrderItemQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderItemQueryServiceTrait {
    async fn find_order_item_by_order(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<Vec<OrderItemResponse>>, ServiceError>;
}
