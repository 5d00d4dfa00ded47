mod observability;
mod order;
mod order_item;

pub use self::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService};
pub use self::order_item::OrderItemQueryService;
