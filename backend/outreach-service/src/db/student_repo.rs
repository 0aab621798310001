use async_trait::async_trait;
use org_authz::StoreError;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::{NewStudentRecord, StudentRecord, StudentRecordPatch};
use crate::repository::RecordStore;

const STUDENT_COLUMNS: &str = "id, student_name, last_lesson, last_lesson_date, \
     next_lesson_date, notes, is_active, tracker_id, created_at, updated_at";

/// Student records backed by PostgreSQL.
#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<StudentRecord> for PgStudentStore {
    async fn create_record(
        &self,
        draft: NewStudentRecord,
        owner_id: Uuid,
    ) -> Result<StudentRecord, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO student_records
                (id, student_name, last_lesson, last_lesson_date, next_lesson_date, notes,
                 is_active, tracker_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, NOW(), NOW())
            RETURNING {STUDENT_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, StudentRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(&draft.student_name)
            .bind(&draft.last_lesson)
            .bind(draft.last_lesson_date)
            .bind(draft.next_lesson_date)
            .bind(&draft.notes)
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        debug!(record_id = %record.id, %owner_id, "Inserted student record");
        Ok(record)
    }

    async fn update_record(
        &self,
        id: Uuid,
        patch: StudentRecordPatch,
    ) -> Result<Option<StudentRecord>, StoreError> {
        let sql = format!(
            r#"
            UPDATE student_records
            SET student_name = COALESCE($2, student_name),
                last_lesson = CASE WHEN $3 THEN $4 ELSE last_lesson END,
                last_lesson_date = CASE WHEN $5 THEN $6 ELSE last_lesson_date END,
                next_lesson_date = CASE WHEN $7 THEN $8 ELSE next_lesson_date END,
                notes = CASE WHEN $9 THEN $10 ELSE notes END,
                is_active = COALESCE($11, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, StudentRecord>(&sql)
            .bind(id)
            .bind(&patch.student_name)
            .bind(patch.last_lesson.is_some())
            .bind(patch.last_lesson.flatten())
            .bind(patch.last_lesson_date.is_some())
            .bind(patch.last_lesson_date.flatten())
            .bind(patch.next_lesson_date.is_some())
            .bind(patch.next_lesson_date.flatten())
            .bind(patch.notes.is_some())
            .bind(patch.notes.flatten())
            .bind(patch.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn get_record(&self, id: Uuid) -> Result<Option<StudentRecord>, StoreError> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM student_records WHERE id = $1");
        sqlx::query_as::<_, StudentRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn list_records(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM student_records ORDER BY updated_at DESC");
        sqlx::query_as::<_, StudentRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)
    }

    async fn list_records_owned_by(
        &self,
        owner_ids: &[Uuid],
    ) -> Result<Vec<StudentRecord>, StoreError> {
        let sql = format!(
            r#"
            SELECT {STUDENT_COLUMNS}
            FROM student_records
            WHERE tracker_id = ANY($1)
            ORDER BY updated_at DESC
            "#
        );
        sqlx::query_as::<_, StudentRecord>(&sql)
            .bind(owner_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(StoreError::backend)
    }
}
