/// Org service - region and group administration
use org_authz::{Group, HierarchyResolver, OrgDirectory, Region, Role, User};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{NewGroup, NewRegion};
use crate::repository::OrgWriter;

#[derive(Clone)]
pub struct OrgService {
    directory: Arc<dyn OrgDirectory>,
    writer: Arc<dyn OrgWriter>,
    resolver: HierarchyResolver,
}

impl OrgService {
    pub fn new(directory: Arc<dyn OrgDirectory>, writer: Arc<dyn OrgWriter>) -> Self {
        Self {
            resolver: HierarchyResolver::new(directory.clone()),
            directory,
            writer,
        }
    }

    /// Directors only.
    pub async fn create_region(
        &self,
        actor: Option<&User>,
        region: NewRegion,
    ) -> ServiceResult<Region> {
        let actor = actor.ok_or(ServiceError::Unauthenticated)?;
        if actor.role() != Role::Director {
            return Err(ServiceError::Forbidden(
                "Only directors can create regions".to_string(),
            ));
        }
        region.validate()?;

        let region = self.writer.create_region(region).await?;
        info!(region_id = %region.id, user_id = %actor.id, "Region created");
        Ok(region)
    }

    /// Directors anywhere; region leaders inside their own region.
    ///
    /// Authorization runs before the region lookup; a denied caller gets
    /// `Forbidden` whether or not the region exists.
    pub async fn create_group(
        &self,
        actor: Option<&User>,
        group: NewGroup,
    ) -> ServiceResult<Group> {
        let actor = actor.ok_or(ServiceError::Unauthenticated)?;

        let allowed = match actor.role() {
            Role::Director => true,
            Role::RegionLeader => {
                self.resolver.leader_region(actor.id).await? == Some(group.region_id)
            }
            Role::GroupLeader | Role::GroupMember => false,
        };
        if !allowed {
            return Err(ServiceError::Forbidden(
                "Not authorized to create a group in this region".to_string(),
            ));
        }
        group.validate()?;

        if self.directory.get_region(group.region_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("region {}", group.region_id)));
        }

        let group = self.writer.create_group(group).await?;
        info!(
            group_id = %group.id,
            region_id = %group.region_id,
            user_id = %actor.id,
            "Group created"
        );
        Ok(group)
    }

    /// Regions the acting user belongs to; every region for a director.
    pub async fn list_regions(&self, actor: Option<&User>) -> ServiceResult<Vec<Region>> {
        let actor = actor.ok_or(ServiceError::Unauthenticated)?;

        let region_id = match actor.role() {
            Role::Director => return Ok(self.directory.list_regions().await?),
            Role::RegionLeader => self.resolver.leader_region(actor.id).await?,
            Role::GroupLeader => {
                let group_id = self.resolver.leader_group(actor.id).await?;
                self.region_of_group(group_id).await?
            }
            Role::GroupMember => {
                let group_id = self.resolver.member_group(actor.id).await?;
                self.region_of_group(group_id).await?
            }
        };

        let Some(region_id) = region_id else {
            return Ok(Vec::new());
        };
        Ok(self.directory.get_region(region_id).await?.into_iter().collect())
    }

    async fn region_of_group(&self, group_id: Option<Uuid>) -> ServiceResult<Option<Uuid>> {
        let Some(group_id) = group_id else {
            return Ok(None);
        };
        Ok(self
            .directory
            .get_group(group_id)
            .await?
            .map(|group| group.region_id))
    }
}
