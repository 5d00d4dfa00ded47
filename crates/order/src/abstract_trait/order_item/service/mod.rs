mod query;

pub use self::query::{DynOrderItemQueryService, OrderItemQueryServiceTrait};
