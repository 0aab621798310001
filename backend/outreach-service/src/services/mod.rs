/// Business logic layer for outreach-service
///
/// Services combine the authorization engine with the stores. Every call
/// takes the acting user explicitly; `None` means unauthenticated.
pub mod org;
pub mod records;

pub use org::OrgService;
pub use records::{ContactService, RecordService, StudentRecordService};
