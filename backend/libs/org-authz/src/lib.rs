//! Hierarchical authorization for org-scoped records
//!
//! The organization is a fixed four-tier tree: a director over regions,
//! region leaders over the groups in their region, and group leaders over
//! their group's members. This crate answers two questions per request:
//!
//! - which owners' records may a user read ([`HierarchyResolver`] and
//!   [`AuthorizationEngine::filter_visible`])
//! - may a user modify a given record ([`AuthorizationEngine::can_modify`])
//!
//! Both fail closed. Missing profile data never widens access, and store
//! outages surface as [`AuthzError::StoreUnavailable`] instead of a silent
//! denial.

pub mod directory;
pub mod engine;
pub mod error;
pub mod memory;
pub mod model;
pub mod record;
pub mod scope;

pub use directory::OrgDirectory;
pub use engine::AuthorizationEngine;
pub use error::{AuthzError, AuthzResult, ModelError, StoreError};
pub use memory::InMemoryDirectory;
pub use model::{Group, GroupSeat, Region, Role, RoleProfile, Seat, User};
pub use record::{sort_newest_first, OwnedRecord};
pub use scope::{HierarchyResolver, Scope};
