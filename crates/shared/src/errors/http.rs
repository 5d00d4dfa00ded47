use crate::errors::{
    error::ErrorResponse,
    service::{ErrorKind, ServiceError},
    workflow::WorkflowError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum HttpError {
    BadRequest(ErrorResponse),
    NotFound(ErrorResponse),
    Conflict(ErrorResponse),
    UnprocessableEntity(ErrorResponse),
    Internal(ErrorResponse),
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Conflict(_) => StatusCode::CONFLICT,
            HttpError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> &ErrorResponse {
        match self {
            HttpError::BadRequest(body)
            | HttpError::NotFound(body)
            | HttpError::Conflict(body)
            | HttpError::UnprocessableEntity(body)
            | HttpError::Internal(body) => body,
        }
    }

    fn from_kind(kind: ErrorKind, body: ErrorResponse) -> Self {
        match kind {
            ErrorKind::Validation => HttpError::BadRequest(body),
            ErrorKind::ReferenceNotFound => HttpError::NotFound(body),
            ErrorKind::InsufficientStock => HttpError::UnprocessableEntity(body),
            ErrorKind::Conflict | ErrorKind::AlreadyInTargetState | ErrorKind::InvalidState => {
                HttpError::Conflict(body)
            }
            ErrorKind::RepositoryWriteFailed => HttpError::Internal(body),
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        let body = ErrorResponse::new(err.code(), err.public_message());
        HttpError::from_kind(err.kind(), body)
    }
}

impl From<WorkflowError> for HttpError {
    fn from(err: WorkflowError) -> Self {
        let mut body = ErrorResponse::new(err.code(), err.error.public_message());
        body.trace_id = Some(err.trace_id.clone());
        body.partially_applied = err.progress.is_partial();

        HttpError::from_kind(err.kind(), body)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            HttpError::BadRequest(body)
            | HttpError::NotFound(body)
            | HttpError::Conflict(body)
            | HttpError::UnprocessableEntity(body)
            | HttpError::Internal(body) => body,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{RepositoryError, WriteProgress};

    #[test]
    fn reference_not_found_maps_to_404() {
        let err = HttpError::from(ServiceError::OrderNotFound(7));

        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.body().code, "ORDER_NOT_FOUND");
        assert_eq!(err.body().message, "Order 7 not found");
    }

    #[test]
    fn insufficient_stock_maps_to_422() {
        let err = HttpError::from(ServiceError::InsufficientStock {
            product_id: 10,
            requested: 2,
            available: 1,
        });

        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.body().code, "INSUFFICIENT_STOCK");
    }

    #[test]
    fn repository_failure_hides_store_text() {
        let err = HttpError::from(ServiceError::Repo(RepositoryError::Custom(
            "relation \"orders\" does not exist".into(),
        )));

        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.body().message.contains("relation"));
    }

    #[test]
    fn foreign_key_violation_maps_to_409_without_store_text() {
        let err = HttpError::from(ServiceError::Repo(RepositoryError::ForeignKey(
            "violates foreign key constraint \"order_items_order_id_fkey\"".into(),
        )));

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert!(!err.body().message.contains("fkey"));
    }

    #[test]
    fn workflow_error_carries_trace_and_progress() {
        let err = HttpError::from(WorkflowError::new(
            ServiceError::OrderAlreadyTrashed(3),
            WriteProgress::PartiallyApplied {
                committed_writes: 2,
            },
            "abc123",
        ));

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.body().trace_id.as_deref(), Some("abc123"));
        assert!(err.body().partially_applied);
    }
}
