use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A record created and owned by exactly one user.
///
/// Ownership is fixed at creation. Implementors pick the timestamp that
/// orders their read path (creation time for contacts, last update for
/// student records).
pub trait OwnedRecord: Send + Sync {
    /// Human-readable record kind, used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    fn owner_id(&self) -> Uuid;

    /// Timestamp the read path orders by, newest first.
    fn recency(&self) -> DateTime<Utc>;
}

/// Order records newest-first by their recency key. Ties keep input order.
pub fn sort_newest_first<R: OwnedRecord>(records: &mut [R]) {
    records.sort_by(|a, b| b.recency().cmp(&a.recency()));
}
