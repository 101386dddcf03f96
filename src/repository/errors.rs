use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Storage failure reported by a repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    /// A unique key already holds this value, e.g. a second stage slug.
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Referential or check constraint rejected the write, e.g. a product
    /// pointer aimed at another product's stage.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Another writer held the database lock past the busy timeout.
    #[error("Database busy: {0}")]
    Busy(String),

    /// A stored row does not satisfy the domain types.
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// True for failures a retry of the same write may clear.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RepositoryError::Busy(_) | RepositoryError::ConnectionError(_)
        )
    }
}

fn is_lock_message(message: &str) -> bool {
    message.contains("database is locked") || message.contains("database is busy")
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => RepositoryError::Duplicate(message),
                    DatabaseErrorKind::ForeignKeyViolation
                    | DatabaseErrorKind::NotNullViolation
                    | DatabaseErrorKind::CheckViolation => {
                        RepositoryError::ConstraintViolation(message)
                    }
                    _ if is_lock_message(&message) => RepositoryError::Busy(message),
                    _ => RepositoryError::DatabaseError(message),
                }
            }
            DieselError::DeserializationError(e) => RepositoryError::InvalidRow(e.to_string()),
            other => RepositoryError::DatabaseError(other.to_string()),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}
