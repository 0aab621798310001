/// Error types for outreach-service
///
/// Each variant maps to one outcome a transport layer must distinguish:
/// no acting user, missing target, denied, store outage, bad payload.
use org_authz::{AuthzError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ServiceError {
    /// HTTP status a transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::Unauthenticated => 401,
            ServiceError::Forbidden(_) => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::InvalidInput(_) => 400,
            ServiceError::StoreUnavailable(_) => 503,
        }
    }

    /// JSON error body in the shape the API returns.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "status": self.status_code(),
        })
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Unauthenticated => ServiceError::Unauthenticated,
            AuthzError::Forbidden(msg) => ServiceError::Forbidden(msg),
            AuthzError::StoreUnavailable(e) => ServiceError::StoreUnavailable(e),
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::StoreUnavailable(StoreError::backend(err))
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
