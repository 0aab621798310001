/// Error types for org-authz
use thiserror::Error;

use crate::model::Role;

/// Invariant violations when building model values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("profile for {profile} cannot be attached to a {role} user")]
    ProfileRoleMismatch { role: Role, profile: Role },

    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Failure reported by a directory or record store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(Box::new(err))
    }
}

#[derive(Error, Debug)]
pub enum AuthzError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// Result type alias for authorization operations
pub type AuthzResult<T> = Result<T, AuthzError>;
