use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use org_authz::{Group, InMemoryDirectory, Region, StoreError};
use uuid::Uuid;

use super::{OrgWriter, RecordStore};
use crate::models::{NewGroup, NewRegion, RecordModel};

/// Record store held entirely in memory.
pub struct InMemoryRecordStore<R> {
    records: DashMap<Uuid, R>,
}

impl<R> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RecordModel> InMemoryRecordStore<R> {
    /// Store a fully built record as-is, e.g. with a backdated timestamp.
    pub fn insert(&self, record: R) {
        self.records.insert(record.id(), record);
    }
}

#[async_trait]
impl<R: RecordModel> RecordStore<R> for InMemoryRecordStore<R> {
    async fn create_record(&self, draft: R::Draft, owner_id: Uuid) -> Result<R, StoreError> {
        let record = R::from_draft(Uuid::new_v4(), owner_id, draft, Utc::now());
        self.records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn update_record(&self, id: Uuid, patch: R::Patch) -> Result<Option<R>, StoreError> {
        Ok(self.records.get_mut(&id).map(|mut entry| {
            entry.apply_patch(patch, Utc::now());
            entry.clone()
        }))
    }

    async fn get_record(&self, id: Uuid) -> Result<Option<R>, StoreError> {
        Ok(self.records.get(&id).map(|r| r.value().clone()))
    }

    async fn list_records(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.records.iter().map(|r| r.value().clone()).collect())
    }

    async fn list_records_owned_by(&self, owner_ids: &[Uuid]) -> Result<Vec<R>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| owner_ids.contains(&r.owner_id()))
            .map(|r| r.value().clone())
            .collect())
    }
}

#[async_trait]
impl OrgWriter for InMemoryDirectory {
    async fn create_region(&self, region: NewRegion) -> Result<Region, StoreError> {
        let now = Utc::now();
        let region = Region {
            id: Uuid::new_v4(),
            name: region.name,
            description: region.description,
            created_at: now,
            updated_at: now,
        };
        self.insert_region(region.clone());
        Ok(region)
    }

    async fn create_group(&self, group: NewGroup) -> Result<Group, StoreError> {
        let now = Utc::now();
        let group = Group {
            id: Uuid::new_v4(),
            name: group.name,
            description: group.description,
            region_id: group.region_id,
            created_at: now,
            updated_at: now,
        };
        self.insert_group(group.clone());
        Ok(group)
    }
}
