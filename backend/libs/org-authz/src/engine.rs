//! Authorization engine
//!
//! Gates the read path (which records a user may list) and the write path
//! (whether a user may modify a given record) for any [`OwnedRecord`] type.
//! Every decision is recomputed from the directory; nothing is cached.

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::directory::OrgDirectory;
use crate::error::{AuthzError, AuthzResult, StoreError};
use crate::model::{Role, User};
use crate::record::{sort_newest_first, OwnedRecord};
use crate::scope::{HierarchyResolver, Scope};

#[derive(Clone)]
pub struct AuthorizationEngine {
    resolver: HierarchyResolver,
}

impl AuthorizationEngine {
    pub fn new(directory: Arc<dyn OrgDirectory>) -> Self {
        Self {
            resolver: HierarchyResolver::new(directory),
        }
    }

    pub fn resolver(&self) -> &HierarchyResolver {
        &self.resolver
    }

    /// Read scope of the acting user.
    pub async fn scope_for(&self, actor: Option<&User>) -> AuthzResult<Scope> {
        let actor = require_actor(actor)?;
        Ok(self.resolver.scope_user_ids(actor).await?)
    }

    /// Keep the records the acting user may read, newest first.
    ///
    /// An empty scope yields an empty list rather than an error.
    pub async fn filter_visible<R: OwnedRecord>(
        &self,
        actor: Option<&User>,
        records: Vec<R>,
    ) -> AuthzResult<Vec<R>> {
        let scope = self.scope_for(actor).await?;

        let mut visible: Vec<R> = records
            .into_iter()
            .filter(|r| scope.admits(r.owner_id()))
            .collect();
        sort_newest_first(&mut visible);
        Ok(visible)
    }

    /// Whether the acting user may modify `record`.
    pub async fn can_modify<R: OwnedRecord>(
        &self,
        actor: Option<&User>,
        record: &R,
    ) -> AuthzResult<bool> {
        let actor = require_actor(actor)?;
        let owner_id = record.owner_id();

        let allowed = if owner_id == actor.id {
            true
        } else {
            match actor.role() {
                Role::Director => true,
                Role::RegionLeader => self.region_leader_may_modify(actor.id, owner_id).await?,
                Role::GroupLeader => self.group_leader_may_modify(actor.id, owner_id).await?,
                Role::GroupMember => false,
            }
        };

        debug!(
            user_id = %actor.id,
            role = %actor.role(),
            record_kind = R::KIND,
            record_id = %record.id(),
            %owner_id,
            allowed,
            "modify check"
        );
        Ok(allowed)
    }

    /// Like [`Self::can_modify`], but a denial becomes [`AuthzError::Forbidden`].
    pub async fn authorize_update<R: OwnedRecord>(
        &self,
        actor: Option<&User>,
        record: &R,
    ) -> AuthzResult<()> {
        if self.can_modify(actor, record).await? {
            Ok(())
        } else {
            Err(AuthzError::Forbidden(format!(
                "Not authorized to modify this {}",
                R::KIND
            )))
        }
    }

    /// Owner to stamp on a record the acting user is creating.
    pub fn owner_for_create(&self, actor: Option<&User>) -> AuthzResult<Uuid> {
        Ok(require_actor(actor)?.id)
    }

    // Both "no profile" and "owner outside the region" collapse to `false`.
    async fn region_leader_may_modify(
        &self,
        leader_id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, StoreError> {
        let Some(group_ids) = self.resolver.region_group_ids(leader_id).await? else {
            return Ok(false);
        };

        Ok(match self.resolver.seated_group(owner_id).await? {
            Some(owner_group) => group_ids.contains(&owner_group),
            None => false,
        })
    }

    // Only members count; a co-leader's records stay out of reach.
    async fn group_leader_may_modify(
        &self,
        leader_id: Uuid,
        owner_id: Uuid,
    ) -> Result<bool, StoreError> {
        let Some(leader_group) = self.resolver.leader_group(leader_id).await? else {
            return Ok(false);
        };

        Ok(self.resolver.member_group(owner_id).await? == Some(leader_group))
    }
}

fn require_actor(actor: Option<&User>) -> AuthzResult<&User> {
    actor.ok_or(AuthzError::Unauthenticated)
}
