use anyhow::Context;
use org_authz::{AuthorizationEngine, InMemoryDirectory, OrgDirectory, User};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::db::{create_pool, PgContactStore, PgOrgDirectory, PgStudentStore};
use crate::error::ServiceResult;
use crate::identity::resolve_bearer;
use crate::models::{EvangelismContact, StudentRecord};
use crate::repository::{InMemoryRecordStore, OrgWriter, RecordStore};
use crate::services::{ContactService, OrgService, StudentRecordService};

/// Everything a transport layer needs, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn OrgDirectory>,
    pub engine: AuthorizationEngine,
    pub contacts: ContactService,
    pub students: StudentRecordService,
    pub org: OrgService,
}

impl AppState {
    pub fn new(
        directory: Arc<dyn OrgDirectory>,
        writer: Arc<dyn OrgWriter>,
        contacts: Arc<dyn RecordStore<EvangelismContact>>,
        students: Arc<dyn RecordStore<StudentRecord>>,
    ) -> Self {
        let engine = AuthorizationEngine::new(directory.clone());
        Self {
            contacts: ContactService::new(engine.clone(), contacts),
            students: StudentRecordService::new(engine.clone(), students),
            org: OrgService::new(directory.clone(), writer),
            directory,
            engine,
        }
    }

    /// State over empty in-memory stores. Returns the directory for seeding.
    pub fn in_memory() -> (Self, Arc<InMemoryDirectory>) {
        let directory = Arc::new(InMemoryDirectory::new());
        let state = Self::new(
            directory.clone(),
            directory.clone(),
            Arc::new(InMemoryRecordStore::<EvangelismContact>::new()),
            Arc::new(InMemoryRecordStore::<StudentRecord>::new()),
        );
        (state, directory)
    }

    /// State over PostgreSQL.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = create_pool(&config.database)
            .await
            .context("Failed to connect to PostgreSQL")?;
        info!(service = %config.app.service_name, "Database connected");

        let directory = Arc::new(PgOrgDirectory::new(pool.clone()));
        Ok(Self::new(
            directory.clone(),
            directory,
            Arc::new(PgContactStore::new(pool.clone())),
            Arc::new(PgStudentStore::new(pool)),
        ))
    }

    /// Acting user for an `Authorization` header value, if any.
    pub async fn authenticate(&self, header: Option<&str>) -> ServiceResult<Option<User>> {
        Ok(resolve_bearer(self.directory.as_ref(), header).await?)
    }
}
