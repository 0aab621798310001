use chrono::{DateTime, Utc};
use org_authz::OwnedRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{clearable_max_len, present, RecordModel};

/// A person being discipled, tracked by the user teaching them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StudentRecord {
    pub id: Uuid,
    pub student_name: String,
    /// What was covered in the last lesson
    pub last_lesson: Option<String>,
    pub last_lesson_date: Option<DateTime<Utc>>,
    pub next_lesson_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub tracker_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewStudentRecord {
    #[validate(length(min = 1, max = 200))]
    pub student_name: String,
    #[validate(length(max = 500))]
    pub last_lesson: Option<String>,
    pub last_lesson_date: Option<DateTime<Utc>>,
    pub next_lesson_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Field updates for a student record; `null` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_student_patch"))]
pub struct StudentRecordPatch {
    #[validate(length(min = 1, max = 200))]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub last_lesson: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub last_lesson_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub next_lesson_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    pub is_active: Option<bool>,
}

fn validate_student_patch(patch: &StudentRecordPatch) -> Result<(), ValidationError> {
    clearable_max_len(&patch.last_lesson, 500)
}

impl OwnedRecord for StudentRecord {
    const KIND: &'static str = "student record";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.tracker_id
    }

    // Student lists surface the most recently touched records first.
    fn recency(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl RecordModel for StudentRecord {
    type Draft = NewStudentRecord;
    type Patch = StudentRecordPatch;

    fn from_draft(id: Uuid, owner_id: Uuid, draft: NewStudentRecord, now: DateTime<Utc>) -> Self {
        Self {
            id,
            student_name: draft.student_name,
            last_lesson: draft.last_lesson,
            last_lesson_date: draft.last_lesson_date,
            next_lesson_date: draft.next_lesson_date,
            notes: draft.notes,
            is_active: true,
            tracker_id: owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: StudentRecordPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.student_name {
            self.student_name = name;
        }
        if let Some(lesson) = patch.last_lesson {
            self.last_lesson = lesson;
        }
        if let Some(date) = patch.last_lesson_date {
            self.last_lesson_date = date;
        }
        if let Some(date) = patch.next_lesson_date {
            self.next_lesson_date = date;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
        self.updated_at = now;
    }
}
