use chrono::Duration;

pub const ORDER_BY_ID_PREFIX: &str = "order:find_by_id:";
pub const ITEMS_BY_ORDER_PREFIX: &str = "order_item:find_by_order:";

pub fn order_by_id(order_id: i32) -> String {
    format!("{ORDER_BY_ID_PREFIX}{order_id}")
}

pub fn items_by_order(order_id: i32) -> String {
    format!("{ITEMS_BY_ORDER_PREFIX}{order_id}")
}

pub fn ttl() -> Duration {
    Duration::minutes(5)
}
