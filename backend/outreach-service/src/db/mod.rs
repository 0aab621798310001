//! PostgreSQL adapters
//!
//! Expected tables (owned and migrated outside this service):
//! `users`, `director_profiles`, `region_leader_profiles`,
//! `group_leader_profiles`, `group_member_profiles`, `regions`, `groups`,
//! `evangelism_contacts`, `student_records`. Profile tables are keyed by a
//! unique `user_id`.

pub mod contact_repo;
pub mod org_repo;
pub mod student_repo;

pub use contact_repo::PgContactStore;
pub use org_repo::PgOrgDirectory;
pub use student_repo::PgStudentStore;

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::DatabaseConfig;

/// Create a PostgreSQL connection pool and verify it with a round trip.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    debug!(
        max = config.max_connections,
        min = config.min_connections,
        acquire_timeout_secs = config.acquire_timeout_secs,
        "creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(config.connect_timeout_secs),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!("Database pool created and verified");
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(error = %e, "Database pool verification failed");
            Err(e)
        }
        Err(_) => {
            error!(
                timeout_secs = config.connect_timeout_secs,
                "Database pool verification timed out"
            );
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}
