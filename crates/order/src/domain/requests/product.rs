/// Compare-and-set stock write: applies only while the stored count equals `expected_count`.
#[derive(Debug, Clone)]
pub struct UpdateProductStockRequest {
    pub product_id: i32,
    pub expected_count: i32,
    pub count_in_stock: i32,
}
