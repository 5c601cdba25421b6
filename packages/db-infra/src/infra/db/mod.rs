mod core;

pub use core::{
    connect, orchestrate_migration, DbManager, HealthReport, HealthStatus, ManagerState,
};
