//! Store collaborators used by the services
//!
//! The org directory trait lives in `org_authz`. This module adds the write
//! side: owned-record persistence and region/group creation. PostgreSQL
//! implementations are in `crate::db`, in-memory ones in [`memory`].

pub mod memory;

pub use memory::InMemoryRecordStore;

use async_trait::async_trait;
use org_authz::{Group, Region, StoreError};
use uuid::Uuid;

use crate::models::{NewGroup, NewRegion, RecordModel};

/// Persistence for one owned record type.
#[async_trait]
pub trait RecordStore<R: RecordModel>: Send + Sync {
    /// Insert a record owned by `owner_id`.
    async fn create_record(&self, draft: R::Draft, owner_id: Uuid) -> Result<R, StoreError>;

    /// Apply a patch in place. Returns `None` when no record has that id.
    async fn update_record(&self, id: Uuid, patch: R::Patch) -> Result<Option<R>, StoreError>;

    async fn get_record(&self, id: Uuid) -> Result<Option<R>, StoreError>;

    async fn list_records(&self) -> Result<Vec<R>, StoreError>;

    async fn list_records_owned_by(&self, owner_ids: &[Uuid]) -> Result<Vec<R>, StoreError>;
}

/// Administrative writes to the org tree.
#[async_trait]
pub trait OrgWriter: Send + Sync {
    async fn create_region(&self, region: NewRegion) -> Result<Region, StoreError>;

    async fn create_group(&self, group: NewGroup) -> Result<Group, StoreError>;
}
