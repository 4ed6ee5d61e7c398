use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session already completed: {0}")]
    SessionAlreadyCompleted(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error classes used at the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Conflict,
    Validation,
    Internal,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::UserNotFound(_) | ServiceError::SessionNotFound(_) => {
                ErrorKind::NotFound
            }
            ServiceError::Unauthorized(_) => ErrorKind::Unauthorized,
            ServiceError::UserAlreadyExists(_) | ServiceError::SessionAlreadyCompleted(_) => {
                ErrorKind::Conflict
            }
            ServiceError::InvalidUsername(_) | ServiceError::Validation(_) => {
                ErrorKind::Validation
            }
            ServiceError::Database(_) | ServiceError::Recognition(_) | ServiceError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for ServiceError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        ServiceError::Database(format!("Migration failed: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ServiceError::UserNotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::SessionNotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(ServiceError::Unauthorized("x".into()).kind(), ErrorKind::Unauthorized);
        assert_eq!(ServiceError::UserAlreadyExists("x".into()).kind(), ErrorKind::Conflict);
        assert_eq!(
            ServiceError::SessionAlreadyCompleted("x".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(ServiceError::InvalidUsername("x".into()).kind(), ErrorKind::Validation);
        assert_eq!(ServiceError::Database("x".into()).kind(), ErrorKind::Internal);
        assert_eq!(ServiceError::Recognition("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_sqlx_error_maps_to_database() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
