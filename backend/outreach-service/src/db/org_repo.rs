use async_trait::async_trait;
use chrono::{DateTime, Utc};
use org_authz::{
    Group, GroupSeat, ModelError, OrgDirectory, Region, Role, RoleProfile, Seat, StoreError,
    User,
};
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{NewGroup, NewRegion};
use crate::repository::OrgWriter;

/// Org directory backed by PostgreSQL.
#[derive(Clone)]
pub struct PgOrgDirectory {
    pool: PgPool,
}

impl PgOrgDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    role: String,
    has_director_profile: bool,
    leader_region_id: Option<Uuid>,
    leader_group_id: Option<Uuid>,
    member_group_id: Option<Uuid>,
}

impl UserRow {
    /// Only the profile matching the stored role is attached.
    fn into_user(self) -> Result<User, ModelError> {
        let role: Role = self.role.parse()?;
        let profile = match role {
            Role::Director => self.has_director_profile.then_some(RoleProfile::Director),
            Role::RegionLeader => self
                .leader_region_id
                .map(|region_id| RoleProfile::RegionLeader { region_id }),
            Role::GroupLeader => self
                .leader_group_id
                .map(|group_id| RoleProfile::GroupLeader { group_id }),
            Role::GroupMember => self
                .member_group_id
                .map(|group_id| RoleProfile::GroupMember { group_id }),
        };
        User::new(self.id, self.email, self.name, role, profile)
    }
}

/// A row that does not decode (e.g. an unknown stored role) names no
/// resolvable user.
fn decode_user(row: UserRow) -> Option<User> {
    let user_id = row.id;
    match row.into_user() {
        Ok(user) => Some(user),
        Err(err) => {
            warn!(%user_id, error = %err, "user row does not decode; treating as unknown");
            None
        }
    }
}

#[derive(sqlx::FromRow)]
struct RegionRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RegionRow> for Region {
    fn from(row: RegionRow) -> Self {
        Region {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    region_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            description: row.description,
            region_id: row.region_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl OrgDirectory for PgOrgDirectory {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.email, u.name, u.role,
                   (dp.user_id IS NOT NULL) AS has_director_profile,
                   rlp.region_id AS leader_region_id,
                   glp.group_id AS leader_group_id,
                   gmp.group_id AS member_group_id
            FROM users u
            LEFT JOIN director_profiles dp ON dp.user_id = u.id
            LEFT JOIN region_leader_profiles rlp ON rlp.user_id = u.id
            LEFT JOIN group_leader_profiles glp ON glp.user_id = u.id
            LEFT JOIN group_member_profiles gmp ON gmp.user_id = u.id
            WHERE u.id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.and_then(decode_user))
    }

    async fn get_profile_for_user(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<Option<RoleProfile>, StoreError> {
        let sql = match role {
            Role::Director => "SELECT user_id FROM director_profiles WHERE user_id = $1",
            Role::RegionLeader => "SELECT region_id FROM region_leader_profiles WHERE user_id = $1",
            Role::GroupLeader => "SELECT group_id FROM group_leader_profiles WHERE user_id = $1",
            Role::GroupMember => "SELECT group_id FROM group_member_profiles WHERE user_id = $1",
        };

        let key = sqlx::query_scalar::<_, Uuid>(sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        debug!(%user_id, %role, found = key.is_some(), "profile lookup");
        Ok(key.map(|key| match role {
            Role::Director => RoleProfile::Director,
            Role::RegionLeader => RoleProfile::RegionLeader { region_id: key },
            Role::GroupLeader => RoleProfile::GroupLeader { group_id: key },
            Role::GroupMember => RoleProfile::GroupMember { group_id: key },
        }))
    }

    async fn get_groups_in_region(&self, region_id: Uuid) -> Result<Vec<Group>, StoreError> {
        let rows = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, description, region_id, created_at, updated_at
            FROM groups
            WHERE region_id = $1
            "#,
        )
        .bind(region_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(Group::from).collect())
    }

    async fn get_group_members_and_leaders(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<GroupSeat>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, bool)>(
            r#"
            SELECT user_id, TRUE AS is_leader FROM group_leader_profiles WHERE group_id = $1
            UNION ALL
            SELECT user_id, FALSE AS is_leader FROM group_member_profiles WHERE group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, is_leader)| GroupSeat {
                user_id,
                seat: if is_leader { Seat::Leader } else { Seat::Member },
            })
            .collect())
    }

    async fn get_region(&self, region_id: Uuid) -> Result<Option<Region>, StoreError> {
        let row = sqlx::query_as::<_, RegionRow>(
            "SELECT id, name, description, created_at, updated_at FROM regions WHERE id = $1",
        )
        .bind(region_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(Region::from))
    }

    async fn get_group(&self, group_id: Uuid) -> Result<Option<Group>, StoreError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT id, name, description, region_id, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(row.map(Group::from))
    }

    async fn list_regions(&self) -> Result<Vec<Region>, StoreError> {
        let rows = sqlx::query_as::<_, RegionRow>(
            "SELECT id, name, description, created_at, updated_at FROM regions ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(rows.into_iter().map(Region::from).collect())
    }
}

#[async_trait]
impl OrgWriter for PgOrgDirectory {
    async fn create_region(&self, region: NewRegion) -> Result<Region, StoreError> {
        let row = sqlx::query_as::<_, RegionRow>(
            r#"
            INSERT INTO regions (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&region.name)
        .bind(&region.description)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        debug!(region_id = %row.id, "Created region in PostgreSQL");
        Ok(row.into())
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group, StoreError> {
        let row = sqlx::query_as::<_, GroupRow>(
            r#"
            INSERT INTO groups (id, name, description, region_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, name, description, region_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.region_id)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        debug!(group_id = %row.id, region_id = %row.region_id, "Created group in PostgreSQL");
        Ok(row.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: "someone@example.org".to_string(),
            name: "Someone".to_string(),
            role: role.to_string(),
            has_director_profile: false,
            leader_region_id: None,
            leader_group_id: None,
            member_group_id: None,
        }
    }

    #[test]
    fn test_user_row_attaches_only_matching_profile() {
        let group_id = Uuid::new_v4();
        let user = UserRow {
            leader_region_id: Some(Uuid::new_v4()),
            member_group_id: Some(group_id),
            ..row("GROUP_MEMBER")
        }
        .into_user()
        .unwrap();

        assert_eq!(user.role(), Role::GroupMember);
        assert_eq!(user.profile(), Some(&RoleProfile::GroupMember { group_id }));
    }

    #[test]
    fn test_leader_row_without_profile_decodes() {
        let user = row("REGION_LEADER").into_user().unwrap();
        assert_eq!(user.role(), Role::RegionLeader);
        assert!(user.profile().is_none());
    }

    #[test]
    fn test_unknown_role_names_no_user() {
        let err = row("DEACON").into_user().unwrap_err();
        assert_eq!(err, ModelError::UnknownRole("DEACON".to_string()));
        assert!(decode_user(row("DEACON")).is_none());
        assert!(decode_user(row("DIRECTOR")).is_some());
    }
}
