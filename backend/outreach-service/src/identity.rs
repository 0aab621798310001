//! Acting-user resolution
//!
//! Development auth scheme: the bearer token is the user's id. There is no
//! signature to check, so this must sit behind a real identity layer in any
//! shared deployment.

use org_authz::{OrgDirectory, StoreError, User};
use tracing::debug;
use uuid::Uuid;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the acting user from an `Authorization` header value.
///
/// Anything that does not name a known user yields `Ok(None)`. Store
/// failures are returned as errors.
pub async fn resolve_bearer(
    directory: &dyn OrgDirectory,
    header: Option<&str>,
) -> Result<Option<User>, StoreError> {
    let Some(token) = header.and_then(|h| h.strip_prefix(BEARER_PREFIX)) else {
        return Ok(None);
    };

    let Ok(user_id) = Uuid::parse_str(token.trim()) else {
        debug!("bearer token is not a user id");
        return Ok(None);
    };

    let user = directory.get_user(user_id).await?;
    if user.is_none() {
        debug!(%user_id, "bearer token names an unknown user");
    }
    Ok(user)
}
