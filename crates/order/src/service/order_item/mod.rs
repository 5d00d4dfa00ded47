mod query;

pub use self::query::OrderItemQueryService;
