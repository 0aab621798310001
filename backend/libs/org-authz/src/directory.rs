use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{Group, GroupSeat, Region, Role, RoleProfile, User};

/// Read-only view of the organization, backed by the external data store.
///
/// Implementations return `Ok(None)` / empty collections for missing rows and
/// reserve `Err` for backend failures.
#[async_trait]
pub trait OrgDirectory: Send + Sync {
    /// Look up a user with their profile expanded.
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError>;

    /// Look up the profile of the given kind attached to a user.
    async fn get_profile_for_user(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<Option<RoleProfile>, StoreError>;

    async fn get_groups_in_region(&self, region_id: Uuid) -> Result<Vec<Group>, StoreError>;

    /// Every leader and member seated in a group.
    async fn get_group_members_and_leaders(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<GroupSeat>, StoreError>;

    async fn get_region(&self, region_id: Uuid) -> Result<Option<Region>, StoreError>;

    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, StoreError>;

    /// All regions ordered by name.
    async fn list_regions(&self) -> Result<Vec<Region>, StoreError>;
}
