/// Data models for outreach-service
///
/// This module defines structures for:
/// - EvangelismContact: people met during street evangelism
/// - StudentRecord: people being discipled in ongoing lessons
/// - NewRegion / NewGroup: org administration payloads
///
/// Org users, regions and groups themselves live in `org_authz::model`.
pub mod contact;
pub mod org;
pub mod student;

pub use contact::{ContactPatch, EvangelismContact, NewContact};
pub use org::{NewGroup, NewRegion};
pub use student::{NewStudentRecord, StudentRecord, StudentRecordPatch};

use chrono::{DateTime, Utc};
use org_authz::OwnedRecord;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// An owned record type the record services can create, list and update.
///
/// Drafts never carry an owner; the service stamps it from the acting user.
/// Patches have no owner field, so ownership cannot change after creation.
pub trait RecordModel: OwnedRecord + Clone + 'static {
    type Draft: Validate + Send + Sync + 'static;
    type Patch: Validate + Send + Sync + 'static;

    fn from_draft(id: Uuid, owner_id: Uuid, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

/// Deserialize a field that is present (even as `null`) into `Some`.
///
/// With `#[serde(default)]` this separates "absent" (`None`) from "set to
/// null" (`Some(None)`) on patch fields.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn clearable_max_len(value: &Option<Option<String>>, max: usize) -> Result<(), ValidationError> {
    match value {
        Some(Some(text)) if text.chars().count() > max => Err(ValidationError::new("length")),
        _ => Ok(()),
    }
}
