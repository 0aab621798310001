/// Record service - create, update and list owned records under hierarchy rules
use org_authz::{sort_newest_first, AuthorizationEngine, Scope, User};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{EvangelismContact, RecordModel, StudentRecord};
use crate::repository::RecordStore;

pub type ContactService = RecordService<EvangelismContact>;
pub type StudentRecordService = RecordService<StudentRecord>;

#[derive(Clone)]
pub struct RecordService<R: RecordModel> {
    engine: AuthorizationEngine,
    store: Arc<dyn RecordStore<R>>,
}

impl<R: RecordModel> RecordService<R> {
    pub fn new(engine: AuthorizationEngine, store: Arc<dyn RecordStore<R>>) -> Self {
        Self { engine, store }
    }

    /// Records the acting user may read, newest first.
    pub async fn list_visible(&self, actor: Option<&User>) -> ServiceResult<Vec<R>> {
        let scope = self.engine.scope_for(actor).await?;

        let mut records = match &scope {
            Scope::All => self.store.list_records().await?,
            Scope::Users(ids) if ids.is_empty() => Vec::new(),
            Scope::Users(ids) => {
                let owners: Vec<Uuid> = ids.iter().copied().collect();
                self.store.list_records_owned_by(&owners).await?
            }
        };
        sort_newest_first(&mut records);
        Ok(records)
    }

    /// Create a record owned by the acting user.
    pub async fn create(&self, actor: Option<&User>, draft: R::Draft) -> ServiceResult<R> {
        let owner_id = self.engine.owner_for_create(actor)?;
        draft.validate()?;

        let record = self.store.create_record(draft, owner_id).await?;
        info!(
            record_kind = R::KIND,
            record_id = %record.id(),
            %owner_id,
            "Record created"
        );
        Ok(record)
    }

    /// Apply `patch` to record `id` if the acting user may modify it.
    pub async fn update(
        &self,
        actor: Option<&User>,
        id: Uuid,
        patch: R::Patch,
    ) -> ServiceResult<R> {
        let actor = actor.ok_or(ServiceError::Unauthenticated)?;

        let existing = self
            .store
            .get_record(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {}", R::KIND, id)))?;

        self.engine.authorize_update(Some(actor), &existing).await?;
        patch.validate()?;

        let updated = self
            .store
            .update_record(id, patch)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("{} {}", R::KIND, id)))?;

        info!(
            record_kind = R::KIND,
            record_id = %id,
            user_id = %actor.id,
            owner_id = %updated.owner_id(),
            "Record updated"
        );
        Ok(updated)
    }
}
