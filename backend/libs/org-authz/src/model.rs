//! Organization model: users, their role tier, and the region/group tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ModelError;

/// The four organizational tiers, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Director,
    RegionLeader,
    GroupLeader,
    GroupMember,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Director => "DIRECTOR",
            Role::RegionLeader => "REGION_LEADER",
            Role::GroupLeader => "GROUP_LEADER",
            Role::GroupMember => "GROUP_MEMBER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DIRECTOR" => Ok(Role::Director),
            "REGION_LEADER" => Ok(Role::RegionLeader),
            "GROUP_LEADER" => Ok(Role::GroupLeader),
            "GROUP_MEMBER" => Ok(Role::GroupMember),
            other => Err(ModelError::UnknownRole(other.to_string())),
        }
    }
}

/// Role-specific attachment that places a user in the org tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleProfile {
    Director,
    RegionLeader { region_id: Uuid },
    GroupLeader { group_id: Uuid },
    GroupMember { group_id: Uuid },
}

impl RoleProfile {
    /// The role this profile variant belongs to.
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Director => Role::Director,
            RoleProfile::RegionLeader { .. } => Role::RegionLeader,
            RoleProfile::GroupLeader { .. } => Role::GroupLeader,
            RoleProfile::GroupMember { .. } => Role::GroupMember,
        }
    }

    /// Group the profile is attached to, for leader and member profiles.
    pub fn group_id(&self) -> Option<Uuid> {
        match self {
            RoleProfile::GroupLeader { group_id } | RoleProfile::GroupMember { group_id } => {
                Some(*group_id)
            }
            RoleProfile::Director | RoleProfile::RegionLeader { .. } => None,
        }
    }

    pub fn region_id(&self) -> Option<Uuid> {
        match self {
            RoleProfile::RegionLeader { region_id } => Some(*region_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub(crate) role: Role,
    pub(crate) profile: Option<RoleProfile>,
}

impl User {
    /// Build a user, rejecting a profile that belongs to a different role.
    pub fn new(
        id: Uuid,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        profile: Option<RoleProfile>,
    ) -> Result<Self, ModelError> {
        if let Some(profile) = &profile {
            if profile.role() != role {
                return Err(ModelError::ProfileRoleMismatch {
                    role,
                    profile: profile.role(),
                });
            }
        }

        Ok(Self {
            id,
            email: email.into(),
            name: name.into(),
            role,
            profile,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn profile(&self) -> Option<&RoleProfile> {
        self.profile.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub region_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Position a user holds inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    Leader,
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupSeat {
    pub user_id: Uuid,
    pub seat: Seat,
}
