use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

fn default_page() -> i32 {
    1
}

fn default_page_size() -> i32 {
    10
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllOrder {
    #[serde(default)]
    pub search: String,

    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    pub page: i32,

    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    pub page_size: i32,
}

impl FindAllOrder {
    /// Rows to skip for the requested page. Computed in `i64` since a valid
    /// `page` times `page_size` can exceed `i32::MAX`.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1).max(0) * i64::from(self.page_size)
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(range(min = 1))]
    pub merchant_id: i32,

    #[validate(range(min = 1))]
    pub cashier_id: i32,

    #[validate(length(min = 1, message = "items cannot be empty"), nested)]
    pub items: Vec<CreateOrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct CreateOrderItemRequest {
    #[validate(range(min = 1))]
    pub product_id: i32,

    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct UpdateOrderRequest {
    #[validate(range(min = 1))]
    pub order_id: i32,

    #[validate(length(min = 1, message = "items cannot be empty"), nested)]
    pub items: Vec<UpdateOrderItemRequest>,
}

/// JSON body of `PUT /api/orders/{id}`; the order id comes from the path.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct UpdateOrderBody {
    #[validate(length(min = 1, message = "items cannot be empty"), nested)]
    pub items: Vec<UpdateOrderItemRequest>,
}

impl UpdateOrderBody {
    pub fn into_request(self, order_id: i32) -> UpdateOrderRequest {
        UpdateOrderRequest {
            order_id,
            items: self.items,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, ToSchema)]
pub struct UpdateOrderItemRequest {
    /// Existing line to edit. Absent or `0` adds a new line.
    #[serde(default)]
    pub order_item_id: Option<i32>,

    #[validate(range(min = 1))]
    pub product_id: i32,

    #[validate(range(min = 1))]
    pub quantity: i32,
}

impl UpdateOrderItemRequest {
    pub fn existing_item_id(&self) -> Option<i32> {
        self.order_item_id.filter(|id| *id > 0)
    }
}

#[derive(Debug, Clone)]
pub struct CreateOrderRecordRequest {
    pub merchant_id: i32,
    pub cashier_id: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateOrderRecordRequest {
    pub order_id: i32,
    pub total_price: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_order_without_items_is_rejected() {
        let req = CreateOrderRequest {
            merchant_id: 1,
            cashier_id: 1,
            items: vec![],
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn create_order_line_quantity_must_be_positive() {
        let req = CreateOrderRequest {
            merchant_id: 1,
            cashier_id: 1,
            items: vec![CreateOrderItemRequest {
                product_id: 10,
                quantity: 0,
            }],
        };

        assert!(req.validate().is_err());
    }

    #[test]
    fn zero_order_item_id_means_new_line() {
        let line = UpdateOrderItemRequest {
            order_item_id: Some(0),
            product_id: 10,
            quantity: 1,
        };

        assert_eq!(line.existing_item_id(), None);
    }

    #[test]
    fn find_all_defaults_apply() {
        let req: FindAllOrder = serde_json::from_str("{}").expect("defaults should apply");

        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 10);
        assert!(req.search.is_empty());
    }

    #[test]
    fn offset_of_a_far_page_does_not_overflow() {
        let req = FindAllOrder {
            search: String::new(),
            page: 30_000_000,
            page_size: 100,
        };

        assert!(req.validate().is_ok());
        assert_eq!(req.offset(), 2_999_999_900);
    }

    #[test]
    fn first_page_starts_at_zero() {
        let req: FindAllOrder = serde_json::from_str(r#"{"page_size": 25}"#).expect("parse");

        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn update_body_takes_the_order_id_from_the_caller() {
        let body: UpdateOrderBody =
            serde_json::from_str(r#"{"items":[{"product_id":10,"quantity":2}]}"#).expect("parse");

        assert!(body.validate().is_ok());

        let req = body.into_request(42);
        assert_eq!(req.order_id, 42);
        assert_eq!(req.items[0].existing_item_id(), None);
    }
}
