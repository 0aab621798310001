//! Outreach Service Library
//!
//! Evangelism contacts and student records for a four-tier organization,
//! with every read and write gated by `org_authz`.
//!
//! # Modules
//!
//! - `models`: record, draft and patch types
//! - `repository`: store traits and in-memory stores
//! - `db`: PostgreSQL stores and connection pool
//! - `services`: record and org administration services
//! - `identity`: acting-user resolution from a bearer header
//! - `state`: wiring for a transport layer
//! - `config` / `telemetry`: environment configuration and tracing setup

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;
pub mod telemetry;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
