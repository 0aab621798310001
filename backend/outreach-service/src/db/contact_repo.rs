use async_trait::async_trait;
use org_authz::StoreError;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::{ContactPatch, EvangelismContact, NewContact};
use crate::repository::RecordStore;

const CONTACT_COLUMNS: &str = "id, contact_name, contact_info, location, notes, follow_up_date, \
     contacted, created_by_id, created_at, updated_at";

/// Evangelism contacts backed by PostgreSQL.
#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
}

impl PgContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<EvangelismContact> for PgContactStore {
    async fn create_record(
        &self,
        draft: NewContact,
        owner_id: Uuid,
    ) -> Result<EvangelismContact, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO evangelism_contacts
                (id, contact_name, contact_info, location, notes, follow_up_date,
                 contacted, created_by_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7, NOW(), NOW())
            RETURNING {CONTACT_COLUMNS}
            "#
        );

        let contact = sqlx::query_as::<_, EvangelismContact>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.contact_name)
            .bind(&draft.contact_info)
            .bind(&draft.location)
            .bind(&draft.notes)
            .bind(draft.follow_up_date)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        debug!(contact_id = %contact.id, %owner_id, "Inserted evangelism contact");
        Ok(contact)
    }

    async fn update_record(
        &self,
        id: Uuid,
        patch: ContactPatch,
    ) -> Result<Option<EvangelismContact>, StoreError> {
        let sql = format!(
            r#"
            UPDATE evangelism_contacts
            SET contact_name = COALESCE($2, contact_name),
                contact_info = CASE WHEN $3 THEN $4 ELSE contact_info END,
                location = CASE WHEN $5 THEN $6 ELSE location END,
                notes = CASE WHEN $7 THEN $8 ELSE notes END,
                follow_up_date = CASE WHEN $9 THEN $10 ELSE follow_up_date END,
                contacted = COALESCE($11, contacted),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CONTACT_COLUMNS}
            "#
        );

        // Nullable columns take a "set" flag plus the new value, so NULL can be written.
        sqlx::query_as::<_, EvangelismContact>(&sql)
            .bind(id)
            .bind(&patch.contact_name)
            .bind(patch.contact_info.is_some())
            .bind(patch.contact_info.flatten())
            .bind(patch.location.is_some())
            .bind(patch.location.flatten())
            .bind(patch.notes.is_some())
            .bind(patch.notes.flatten())
            .bind(patch.follow_up_date.is_some())
            .bind(patch.follow_up_date.flatten())
            .bind(patch.contacted)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn get_record(&self, id: Uuid) -> Result<Option<EvangelismContact>, StoreError> {
        let sql = format!("SELECT {CONTACT_COLUMNS} FROM evangelism_contacts WHERE id = $1");
        sqlx::query_as::<_, EvangelismContact>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn list_records(&self) -> Result<Vec<EvangelismContact>, StoreError> {
        let sql =
            format!("SELECT {CONTACT_COLUMNS} FROM evangelism_contacts ORDER BY created_at DESC");
        sqlx::query_as::<_, EvangelismContact>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn list_records_owned_by(
        &self,
        owner_ids: &[Uuid],
    ) -> Result<Vec<EvangelismContact>, StoreError> {
        let sql = format!(
            r#"
            SELECT {CONTACT_COLUMNS}
            FROM evangelism_contacts
            WHERE created_by_id = ANY($1)
            ORDER BY created_at DESC
            "#
        );
        sqlx::query_as::<_, EvangelismContact>(&sql)
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)
    }
}
