use sqlx::{Error as SqlxError, error::ErrorKind as DbErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[source] SqlxError),

    #[error("Not found")]
    NotFound,

    /// A conditional write lost against a concurrent writer.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl RepositoryError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, RepositoryError::Conflict(_))
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.kind() {
                DbErrorKind::UniqueViolation => {
                    return RepositoryError::AlreadyExists(db_err.message().to_string());
                }
                DbErrorKind::ForeignKeyViolation => {
                    return RepositoryError::ForeignKey(db_err.message().to_string());
                }
                _ => {}
            }
        }

        RepositoryError::Sqlx(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::DatabaseError;
    use std::{error::Error as StdError, fmt};

    #[derive(Debug)]
    struct PgFailure {
        message: &'static str,
        kind: DbErrorKind,
    }

    impl fmt::Display for PgFailure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl StdError for PgFailure {}

    impl DatabaseError for PgFailure {
        fn message(&self) -> &str {
            self.message
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> DbErrorKind {
            match self.kind {
                DbErrorKind::UniqueViolation => DbErrorKind::UniqueViolation,
                DbErrorKind::ForeignKeyViolation => DbErrorKind::ForeignKeyViolation,
                _ => DbErrorKind::Other,
            }
        }
    }

    fn db_error(message: &'static str, kind: DbErrorKind) -> SqlxError {
        SqlxError::Database(Box::new(PgFailure { message, kind }))
    }

    #[test]
    fn foreign_key_violation_is_classified() {
        let err = RepositoryError::from(db_error(
            "update or delete on table \"orders\" violates foreign key constraint",
            DbErrorKind::ForeignKeyViolation,
        ));

        assert!(matches!(err, RepositoryError::ForeignKey(msg) if msg.contains("orders")));
    }

    #[test]
    fn unique_violation_is_classified() {
        let err = RepositoryError::from(db_error(
            "duplicate key value violates unique constraint",
            DbErrorKind::UniqueViolation,
        ));

        assert!(matches!(err, RepositoryError::AlreadyExists(_)));
    }

    #[test]
    fn other_database_errors_stay_sqlx() {
        let err = RepositoryError::from(db_error("syntax error", DbErrorKind::Other));

        assert!(matches!(err, RepositoryError::Sqlx(_)));
        assert!(!err.is_conflict());
    }
}
