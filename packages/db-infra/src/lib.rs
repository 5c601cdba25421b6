//! Database infrastructure: connection configuration and lifecycle,
//! migration orchestration, project path layout.

pub mod config;
pub mod error;
pub mod infra;
pub mod paths;

pub use config::db::{
    normalize_database_url, sanitize_db_url, validate_test_database_url, DbConfig, TlsMode,
};
pub use error::DbInfraError;
pub use infra::db::{
    connect, orchestrate_migration, DbManager, HealthReport, HealthStatus, ManagerState,
};
pub use paths::ProjectPaths;
