//! Conversions from domain constraint failures into layer errors.
//!
//! The domain layer does not depend on repository or service error types.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;
#[cfg(feature = "server")]
use crate::services::ServiceError;

#[cfg(feature = "server")]
impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        match val {
            TypeConstraintError::UnknownStage(stage) => ServiceError::InvalidStage(stage),
            other => ServiceError::TypeConstraint(other.to_string()),
        }
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::InvalidRow(val.to_string())
    }
}
