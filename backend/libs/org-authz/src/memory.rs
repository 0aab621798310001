//! In-memory organization directory
//!
//! Backs tests and embedded deployments. Lookups never await and the maps are
//! sharded, so the directory can be shared freely across tasks.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use crate::directory::OrgDirectory;
use crate::error::StoreError;
use crate::model::{Group, GroupSeat, Region, Role, RoleProfile, Seat, User};

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: DashMap<Uuid, User>,
    regions: DashMap<Uuid, Region>,
    groups: DashMap<Uuid, Group>,
    offline: AtomicBool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn insert_region(&self, region: Region) {
        self.regions.insert(region.id, region);
    }

    pub fn insert_group(&self, group: Group) {
        self.groups.insert(group.id, group);
    }

    /// Create and store a region with a fresh id.
    pub fn add_region(&self, name: &str) -> Region {
        let now = Utc::now();
        let region = Region {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        };
        self.insert_region(region.clone());
        region
    }

    /// Create and store a group inside `region_id` with a fresh id.
    pub fn add_group(&self, region_id: Uuid, name: &str) -> Group {
        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            region_id,
            created_at: now,
            updated_at: now,
        };
        self.insert_group(group.clone());
        group
    }

    /// Create and store a user whose role follows from `profile`.
    pub fn add_user(&self, name: &str, profile: RoleProfile) -> User {
        self.store_user(name, profile.role(), Some(profile))
    }

    /// Create and store a user that has a role but no profile row.
    pub fn add_user_without_profile(&self, name: &str, role: Role) -> User {
        self.store_user(name, role, None)
    }

    fn store_user(&self, name: &str, role: Role, profile: Option<RoleProfile>) -> User {
        let id = Uuid::new_v4();
        let email = format!("{}@{}.local", name.to_lowercase().replace(' ', "."), id.simple());
        // Callers derive `role` from `profile` or pass no profile, so the pair agrees.
        let user = User {
            id,
            email,
            name: name.to_string(),
            role,
            profile,
        };
        self.insert_user(user.clone());
        user
    }

    /// Make every lookup fail as if the backend were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::backend(io::Error::new(
                io::ErrorKind::NotConnected,
                "in-memory directory is offline",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl OrgDirectory for InMemoryDirectory {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        self.ensure_online()?;
        Ok(self.users.get(&user_id).map(|u| u.value().clone()))
    }

    async fn get_profile_for_user(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<Option<RoleProfile>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .users
            .get(&user_id)
            .and_then(|u| u.profile().copied())
            .filter(|p| p.role() == role))
    }

    async fn get_groups_in_region(&self, region_id: Uuid) -> Result<Vec<Group>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .groups
            .iter()
            .filter(|g| g.region_id == region_id)
            .map(|g| g.value().clone())
            .collect())
    }

    async fn get_group_members_and_leaders(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<GroupSeat>, StoreError> {
        self.ensure_online()?;
        Ok(self
            .users
            .iter()
            .filter_map(|u| {
                let seat = match u.profile()? {
                    RoleProfile::GroupLeader { group_id: g } if *g == group_id => Seat::Leader,
                    RoleProfile::GroupMember { group_id: g } if *g == group_id => Seat::Member,
                    _ => return None,
                };
                Some(GroupSeat {
                    user_id: u.id,
                    seat,
                })
            })
            .collect())
    }

    async fn get_region(&self, region_id: Uuid) -> Result<Option<Region>, StoreError> {
        self.ensure_online()?;
        Ok(self.regions.get(&region_id).map(|r| r.value().clone()))
    }

    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, StoreError> {
        self.ensure_online()?;
        Ok(self.groups.get(&group_id).map(|g| g.value().clone()))
    }

    async fn list_regions(&self) -> Result<Vec<Region>, StoreError> {
        self.ensure_online()?;
        let mut regions: Vec<Region> = self.regions.iter().map(|r| r.value().clone()).collect();
        regions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(regions)
    }
}
