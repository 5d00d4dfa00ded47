use crate::model::merchant::Merchant;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynMerchantQueryRepository = Arc<dyn MerchantQueryRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait MerchantQueryRepositoryTrait {
    async fn find_by_id(&self, merchant_id: i32) -> Result<Option<Merchant>, RepositoryError>;
}
