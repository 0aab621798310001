use chrono::{DateTime, Utc};
use org_authz::OwnedRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{clearable_max_len, present, RecordModel};

/// A person contacted during street evangelism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EvangelismContact {
    pub id: Uuid,
    pub contact_name: String,
    /// Phone, email or address
    pub contact_info: Option<String>,
    /// Where the contact was made
    pub location: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    /// Whether the follow-up has happened
    pub contacted: bool,
    pub created_by_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewContact {
    #[validate(length(min = 1, max = 200))]
    pub contact_name: String,
    #[validate(length(max = 500))]
    pub contact_info: Option<String>,
    #[validate(length(max = 500))]
    pub location: Option<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
}

/// Field updates for a contact.
///
/// Nullable fields are `Option<Option<T>>`: absent leaves the value alone,
/// `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_contact_patch"))]
pub struct ContactPatch {
    #[validate(length(min = 1, max = 200))]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<Option<DateTime<Utc>>>,
    pub contacted: Option<bool>,
}

fn validate_contact_patch(patch: &ContactPatch) -> Result<(), ValidationError> {
    clearable_max_len(&patch.contact_info, 500)?;
    clearable_max_len(&patch.location, 500)
}

impl OwnedRecord for EvangelismContact {
    const KIND: &'static str = "contact";

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> Uuid {
        self.created_by_id
    }

    fn recency(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl RecordModel for EvangelismContact {
    type Draft = NewContact;
    type Patch = ContactPatch;

    fn from_draft(id: Uuid, owner_id: Uuid, draft: NewContact, now: DateTime<Utc>) -> Self {
        Self {
            id,
            contact_name: draft.contact_name,
            contact_info: draft.contact_info,
            location: draft.location,
            notes: draft.notes,
            follow_up_date: draft.follow_up_date,
            contacted: false,
            created_by_id: owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_patch(&mut self, patch: ContactPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.contact_name {
            self.contact_name = name;
        }
        if let Some(info) = patch.contact_info {
            self.contact_info = info;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(date) = patch.follow_up_date {
            self.follow_up_date = date;
        }
        if let Some(contacted) = patch.contacted {
            self.contacted = contacted;
        }
        self.updated_at = now;
    }
}
