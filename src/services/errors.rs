use thiserror::Error;

use crate::repository::errors::RepositoryError;

/// Failure of a single user action. None of these are fatal to the process.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// Target stage is not in the valid set for the record being moved.
    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("persistence error: {0}")]
    Persistence(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Persistence(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_is_not_a_persistence_failure() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::ConnectionError("pool".into())),
            ServiceError::Persistence(RepositoryError::ConnectionError(_))
        ));
    }
}
