use crate::model::cashier::Cashier;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynCashierQueryRepository = Arc<dyn CashierQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait CashierQueryRepositoryTrait {
    async fn find_by_id(&self, cashier_id: i32) -> Result<Option<Cashier>, RepositoryError>;
}
