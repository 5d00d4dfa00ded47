mod error;
mod http;
mod repository;
mod service;
mod workflow;

pub use self::error::ErrorResponse;
pub use self::http::HttpError;
pub use self::repository::RepositoryError;
pub use self::service::{ErrorKind, ServiceError};
pub use self::workflow::{WorkflowError, WriteLedger, WriteProgress};
