use crate::errors::repository::RepositoryError;
use serde::Serialize;
use thiserror::Error;

/// Coarse failure classes callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Validation,
    ReferenceNotFound,
    InsufficientStock,
    Conflict,
    AlreadyInTargetState,
    InvalidState,
    RepositoryWriteFailed,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::ReferenceNotFound => "REFERENCE_NOT_FOUND",
            ErrorKind::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::AlreadyInTargetState => "ALREADY_IN_TARGET_STATE",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::RepositoryWriteFailed => "REPOSITORY_WRITE_FAILED",
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Merchant {0} not found")]
    MerchantNotFound(i32),

    #[error("Cashier {0} not found")]
    CashierNotFound(i32),

    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Order {0} not found")]
    OrderNotFound(i32),

    #[error("Order item {0} not found")]
    OrderItemNotFound(i32),

    #[error(
        "Insufficient stock for product {product_id}: requested={requested}, available={available}"
    )]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Stock of product {0} changed concurrently, retries exhausted")]
    StockConflict(i32),

    #[error("Order {0} is already trashed")]
    OrderAlreadyTrashed(i32),

    #[error("Order item {0} is already trashed")]
    OrderItemAlreadyTrashed(i32),

    #[error("Order {0} is not trashed")]
    OrderNotTrashed(i32),

    #[error("Order {0} is trashed and cannot be edited")]
    OrderTrashed(i32),

    #[error("Bulk operation on {0} did not complete")]
    BulkOperationIncomplete(&'static str),

    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::MerchantNotFound(_)
            | ServiceError::CashierNotFound(_)
            | ServiceError::ProductNotFound(_)
            | ServiceError::OrderNotFound(_)
            | ServiceError::OrderItemNotFound(_) => ErrorKind::ReferenceNotFound,
            ServiceError::InsufficientStock { .. } => ErrorKind::InsufficientStock,
            ServiceError::StockConflict(_) => ErrorKind::Conflict,
            ServiceError::OrderAlreadyTrashed(_)
            | ServiceError::OrderItemAlreadyTrashed(_)
            | ServiceError::OrderNotTrashed(_) => ErrorKind::AlreadyInTargetState,
            ServiceError::OrderTrashed(_) => ErrorKind::InvalidState,
            ServiceError::Repo(RepositoryError::NotFound) => ErrorKind::ReferenceNotFound,
            ServiceError::Repo(
                RepositoryError::Conflict(_)
                | RepositoryError::AlreadyExists(_)
                | RepositoryError::ForeignKey(_),
            ) => ErrorKind::Conflict,
            ServiceError::BulkOperationIncomplete(_)
            | ServiceError::Repo(_)
            | ServiceError::Internal(_) => ErrorKind::RepositoryWriteFailed,
        }
    }

    /// Stable application-level code, finer grained than [`ErrorKind::code`].
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_FAILED",
            ServiceError::MerchantNotFound(_) => "MERCHANT_NOT_FOUND",
            ServiceError::CashierNotFound(_) => "CASHIER_NOT_FOUND",
            ServiceError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            ServiceError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            ServiceError::OrderItemNotFound(_) => "ORDER_ITEM_NOT_FOUND",
            ServiceError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            ServiceError::StockConflict(_) => "STOCK_CONFLICT",
            ServiceError::OrderAlreadyTrashed(_) => "ORDER_ALREADY_TRASHED",
            ServiceError::OrderItemAlreadyTrashed(_) => "ORDER_ITEM_ALREADY_TRASHED",
            ServiceError::OrderNotTrashed(_) => "ORDER_NOT_TRASHED",
            ServiceError::OrderTrashed(_) => "ORDER_TRASHED",
            ServiceError::BulkOperationIncomplete(_) => "BULK_OPERATION_INCOMPLETE",
            ServiceError::Repo(_) => "REPOSITORY_WRITE_FAILED",
            ServiceError::Internal(_) => "INTERNAL",
        }
    }

    /// Message safe to show to API clients. Store error text stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Repo(RepositoryError::NotFound) => "Resource not found".into(),
            ServiceError::Repo(RepositoryError::Conflict(_)) => {
                "Resource was modified concurrently".into()
            }
            ServiceError::Repo(RepositoryError::AlreadyExists(_)) => "Resource already exists".into(),
            ServiceError::Repo(RepositoryError::ForeignKey(_)) => {
                "Resource is still referenced by other records".into()
            }
            ServiceError::Repo(_) => "Repository operation failed".into(),
            ServiceError::Internal(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(vec![errors.to_string()])
    }
}
