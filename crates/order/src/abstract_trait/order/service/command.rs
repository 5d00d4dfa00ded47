use crate::domain::{
    requests::order::{CreateOrderRequest, UpdateOrderRequest},
    response::{
        api::ApiResponse,
        order::{OrderResponse, OrderResponseDeleteAt},
    },
};
use async_trait::async_trait;
use shared::errors::WorkflowError;
use std::sync::Arc;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, WorkflowError>;
    async fn update_order(
        &self,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, WorkflowError>;
    async fn trashed_order(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<OrderResponseDeleteAt>, WorkflowError>;
    async fn restore_order(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<OrderResponseDeleteAt>, WorkflowError>;
    async fn delete_order_permanent(
        &self,
        order_id: i32,
    ) -> Result<ApiResponse<bool>, WorkflowError>;
    async fn restore_all_order(&self) -> Result<ApiResponse<bool>, WorkflowError>;
    async fn delete_all_order_permanent(&self) -> Result<ApiResponse<bool>, WorkflowError>;
}
