//! Org hierarchy resolution
//!
//! Expands an acting user into the set of owner ids whose records they may
//! read. Directors are never enumerated; the resolver hands back
//! [`Scope::All`] and callers special-case it.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::directory::OrgDirectory;
use crate::error::StoreError;
use crate::model::{Role, RoleProfile, Seat, User};

/// Owner ids an acting user may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Unbounded visibility.
    All,
    Users(HashSet<Uuid>),
}

impl Scope {
    pub fn empty() -> Self {
        Scope::Users(HashSet::new())
    }

    pub fn only(user_id: Uuid) -> Self {
        Scope::Users(HashSet::from([user_id]))
    }

    pub fn admits(&self, owner_id: Uuid) -> bool {
        match self {
            Scope::All => true,
            Scope::Users(ids) => ids.contains(&owner_id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Scope::Users(ids) if ids.is_empty())
    }
}

#[derive(Clone)]
pub struct HierarchyResolver {
    directory: Arc<dyn OrgDirectory>,
}

impl HierarchyResolver {
    pub fn new(directory: Arc<dyn OrgDirectory>) -> Self {
        Self { directory }
    }

    /// Compute the read scope of `actor` from current directory data.
    ///
    /// A leader without a profile row gets an empty scope, not even
    /// themselves.
    pub async fn scope_user_ids(&self, actor: &User) -> Result<Scope, StoreError> {
        let scope = match actor.role() {
            Role::Director => Scope::All,
            Role::RegionLeader => self.region_scope(actor).await?,
            Role::GroupLeader => self.group_scope(actor).await?,
            Role::GroupMember => Scope::only(actor.id),
        };

        match &scope {
            Scope::All => debug!(user_id = %actor.id, role = %actor.role(), "read scope: all"),
            Scope::Users(ids) => debug!(
                user_id = %actor.id,
                role = %actor.role(),
                size = ids.len(),
                "read scope resolved"
            ),
        }
        Ok(scope)
    }

    /// Region a region leader is attached to, if their profile exists.
    pub async fn leader_region(&self, leader_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let profile = self
            .directory
            .get_profile_for_user(leader_id, Role::RegionLeader)
            .await?;
        Ok(profile.as_ref().and_then(RoleProfile::region_id))
    }

    /// Group a group leader is attached to, if their profile exists.
    pub async fn leader_group(&self, leader_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let profile = self
            .directory
            .get_profile_for_user(leader_id, Role::GroupLeader)
            .await?;
        Ok(profile.as_ref().and_then(RoleProfile::group_id))
    }

    /// Group a user belongs to as a member only.
    pub async fn member_group(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        let profile = self
            .directory
            .get_profile_for_user(user_id, Role::GroupMember)
            .await?;
        Ok(profile.as_ref().and_then(RoleProfile::group_id))
    }

    /// Group a user is seated in, checking the leader profile first.
    pub async fn seated_group(&self, user_id: Uuid) -> Result<Option<Uuid>, StoreError> {
        match self.leader_group(user_id).await? {
            Some(group_id) => Ok(Some(group_id)),
            None => self.member_group(user_id).await,
        }
    }

    /// Ids of every group inside the region the leader runs.
    pub async fn region_group_ids(
        &self,
        leader_id: Uuid,
    ) -> Result<Option<HashSet<Uuid>>, StoreError> {
        let Some(region_id) = self.leader_region(leader_id).await? else {
            return Ok(None);
        };

        let groups = self.directory.get_groups_in_region(region_id).await?;
        Ok(Some(groups.into_iter().map(|g| g.id).collect()))
    }

    async fn region_scope(&self, actor: &User) -> Result<Scope, StoreError> {
        let Some(group_ids) = self.region_group_ids(actor.id).await? else {
            warn!(user_id = %actor.id, "region leader has no profile; scope is empty");
            return Ok(Scope::empty());
        };

        let mut ids = HashSet::from([actor.id]);
        for group_id in group_ids {
            let seats = self
                .directory
                .get_group_members_and_leaders(group_id)
                .await?;
            ids.extend(seats.into_iter().map(|s| s.user_id));
        }
        Ok(Scope::Users(ids))
    }

    async fn group_scope(&self, actor: &User) -> Result<Scope, StoreError> {
        let Some(group_id) = self.leader_group(actor.id).await? else {
            warn!(user_id = %actor.id, "group leader has no profile; scope is empty");
            return Ok(Scope::empty());
        };

        let seats = self
            .directory
            .get_group_members_and_leaders(group_id)
            .await?;

        let mut ids = HashSet::from([actor.id]);
        ids.extend(
            seats
                .into_iter()
                .filter(|s| s.seat == Seat::Member)
                .map(|s| s.user_id),
        );
        Ok(Scope::Users(ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDirectory;

    struct Org {
        directory: Arc<InMemoryDirectory>,
        director: User,
        north_leader: User,
        alpha_leader: User,
        alpha_co_leader: User,
        alpha_member: User,
        beta_member: User,
        south_member: User,
    }

    fn org() -> Org {
        let directory = Arc::new(InMemoryDirectory::new());
        let north = directory.add_region("North");
        let south = directory.add_region("South");
        let alpha = directory.add_group(north.id, "Alpha");
        let beta = directory.add_group(north.id, "Beta");
        let gamma = directory.add_group(south.id, "Gamma");

        Org {
            director: directory.add_user("Director", RoleProfile::Director),
            north_leader: directory.add_user(
                "North Leader",
                RoleProfile::RegionLeader {
                    region_id: north.id,
                },
            ),
            alpha_leader: directory.add_user(
                "Alpha Leader",
                RoleProfile::GroupLeader { group_id: alpha.id },
            ),
            alpha_co_leader: directory.add_user(
                "Alpha Co Leader",
                RoleProfile::GroupLeader { group_id: alpha.id },
            ),
            alpha_member: directory.add_user(
                "Alpha Member",
                RoleProfile::GroupMember { group_id: alpha.id },
            ),
            beta_member: directory.add_user(
                "Beta Member",
                RoleProfile::GroupMember { group_id: beta.id },
            ),
            south_member: directory.add_user(
                "South Member",
                RoleProfile::GroupMember { group_id: gamma.id },
            ),
            directory,
        }
    }

    fn ids(users: &[&User]) -> Scope {
        Scope::Users(users.iter().map(|u| u.id).collect())
    }

    #[tokio::test]
    async fn test_director_scope_is_unbounded() {
        let org = org();
        let resolver = HierarchyResolver::new(org.directory.clone());

        let scope = resolver.scope_user_ids(&org.director).await.unwrap();
        assert_eq!(scope, Scope::All);
        assert!(scope.admits(Uuid::new_v4()));
    }

    #[tokio::test]
    async fn test_region_leader_sees_every_seat_in_region() {
        let org = org();
        let resolver = HierarchyResolver::new(org.directory.clone());

        let scope = resolver.scope_user_ids(&org.north_leader).await.unwrap();
        assert_eq!(
            scope,
            ids(&[
                &org.north_leader,
                &org.alpha_leader,
                &org.alpha_co_leader,
                &org.alpha_member,
                &org.beta_member,
            ])
        );
        assert!(!scope.admits(org.south_member.id));
    }

    #[tokio::test]
    async fn test_group_leader_sees_members_but_not_co_leaders() {
        let org = org();
        let resolver = HierarchyResolver::new(org.directory.clone());

        let scope = resolver.scope_user_ids(&org.alpha_leader).await.unwrap();
        assert_eq!(scope, ids(&[&org.alpha_leader, &org.alpha_member]));
        assert!(!scope.admits(org.alpha_co_leader.id));
    }

    #[tokio::test]
    async fn test_group_member_sees_only_self() {
        let org = org();
        let resolver = HierarchyResolver::new(org.directory.clone());

        let scope = resolver.scope_user_ids(&org.beta_member).await.unwrap();
        assert_eq!(scope, Scope::only(org.beta_member.id));
    }

    #[tokio::test]
    async fn test_leaders_without_profile_fail_closed() {
        let org = org();
        let resolver = HierarchyResolver::new(org.directory.clone());
        let orphan_region_leader = org
            .directory
            .add_user_without_profile("Orphan RL", Role::RegionLeader);
        let orphan_group_leader = org
            .directory
            .add_user_without_profile("Orphan GL", Role::GroupLeader);

        let scope = resolver
            .scope_user_ids(&orphan_region_leader)
            .await
            .unwrap();
        assert!(scope.is_empty());
        assert!(!scope.admits(orphan_region_leader.id));

        let scope = resolver.scope_user_ids(&orphan_group_leader).await.unwrap();
        assert!(scope.is_empty());
    }

    #[tokio::test]
    async fn test_directory_outage_is_reported() {
        let org = org();
        let resolver = HierarchyResolver::new(org.directory.clone());
        org.directory.set_offline(true);

        let result = resolver.scope_user_ids(&org.north_leader).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));

        // Members need no lookups at all.
        let scope = resolver.scope_user_ids(&org.alpha_member).await.unwrap();
        assert_eq!(scope, Scope::only(org.alpha_member.id));
    }

    #[tokio::test]
    async fn test_seated_group_prefers_leader_profile() {
        let org = org();
        let resolver = HierarchyResolver::new(org.directory.clone());

        let leader_group = resolver.seated_group(org.alpha_leader.id).await.unwrap();
        let member_group = resolver.seated_group(org.alpha_member.id).await.unwrap();
        assert!(leader_group.is_some());
        assert_eq!(leader_group, member_group);
        assert_eq!(resolver.seated_group(org.director.id).await.unwrap(), None);
    }
}
