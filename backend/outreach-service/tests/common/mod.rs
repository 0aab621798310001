//! Shared fixture for outreach-service integration tests
//!
//! Org layout:
//! - Region North: groups Alpha (leader, co-leader, member) and Beta (leader, member)
//! - Region South: group Gamma (leader, member)
//! - a director, one region leader per region, and a region leader with no profile row
#![allow(dead_code)]

use org_authz::{InMemoryDirectory, Region, Role, RoleProfile, User};
use outreach_service::models::{EvangelismContact, NewContact, StudentRecord};
use outreach_service::repository::InMemoryRecordStore;
use outreach_service::AppState;
use std::sync::Arc;

pub struct Org {
    pub state: AppState,
    pub directory: Arc<InMemoryDirectory>,
    pub contacts: Arc<InMemoryRecordStore<EvangelismContact>>,
    pub students: Arc<InMemoryRecordStore<StudentRecord>>,
    pub north: Region,
    pub south: Region,
    pub director: User,
    pub north_leader: User,
    pub south_leader: User,
    pub unprofiled_region_leader: User,
    pub alpha_leader: User,
    pub alpha_co_leader: User,
    pub alpha_member: User,
    pub beta_leader: User,
    pub beta_member: User,
    pub gamma_member: User,
}

pub fn org() -> Org {
    let directory = Arc::new(InMemoryDirectory::new());
    let contacts = Arc::new(InMemoryRecordStore::<EvangelismContact>::new());
    let students = Arc::new(InMemoryRecordStore::<StudentRecord>::new());

    let north = directory.add_region("North");
    let south = directory.add_region("South");
    let alpha = directory.add_group(north.id, "Alpha");
    let beta = directory.add_group(north.id, "Beta");
    let gamma = directory.add_group(south.id, "Gamma");

    let director = directory.add_user("Director", RoleProfile::Director);
    let north_leader = directory.add_user(
        "North Leader",
        RoleProfile::RegionLeader {
            region_id: north.id,
        },
    );
    let south_leader = directory.add_user(
        "South Leader",
        RoleProfile::RegionLeader {
            region_id: south.id,
        },
    );
    let unprofiled_region_leader =
        directory.add_user_without_profile("Unplaced Leader", Role::RegionLeader);
    let alpha_leader = directory.add_user(
        "Alpha Leader",
        RoleProfile::GroupLeader { group_id: alpha.id },
    );
    let alpha_co_leader = directory.add_user(
        "Alpha Co-Leader",
        RoleProfile::GroupLeader { group_id: alpha.id },
    );
    let alpha_member = directory.add_user(
        "Alpha Member",
        RoleProfile::GroupMember { group_id: alpha.id },
    );
    let beta_leader = directory.add_user(
        "Beta Leader",
        RoleProfile::GroupLeader { group_id: beta.id },
    );
    let beta_member = directory.add_user(
        "Beta Member",
        RoleProfile::GroupMember { group_id: beta.id },
    );
    directory.add_user(
        "Gamma Leader",
        RoleProfile::GroupLeader { group_id: gamma.id },
    );
    let gamma_member = directory.add_user(
        "Gamma Member",
        RoleProfile::GroupMember { group_id: gamma.id },
    );

    let state = AppState::new(
        directory.clone(),
        directory.clone(),
        contacts.clone(),
        students.clone(),
    );

    Org {
        state,
        directory,
        contacts,
        students,
        north,
        south,
        director,
        north_leader,
        south_leader,
        unprofiled_region_leader,
        alpha_leader,
        alpha_co_leader,
        alpha_member,
        beta_leader,
        beta_member,
        gamma_member,
    }
}

pub fn contact(name: &str) -> NewContact {
    NewContact {
        contact_name: name.to_string(),
        ..Default::default()
    }
}
