use crate::{domain::requests::product::UpdateProductStockRequest, model::product::Product};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;
pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    /// Trashed products are reported as missing.
    async fn find_by_id(&self, product_id: i32) -> Result<Option<Product>, RepositoryError>;
}

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    /// Writes `count_in_stock` only while the stored count still equals
    /// `expected_count`. Any other state yields `RepositoryError::Conflict`.
    async fn update_count_stock(
        &self,
        req: &UpdateProductStockRequest,
    ) -> Result<Product, RepositoryError>;
}
