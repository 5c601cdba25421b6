//! Schema migration runner for the civic-registry database.
//!
//! Units are applied at most once per database, tracked in the
//! `schema_history` table, and always in ascending name order.

pub use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

pub mod history;
mod m0001_init_schema; // keep filename + unit name in sync
pub mod runner;

pub use runner::{ApplyReport, MigrateError, MigrationUnit, RevertReport, Runner, UnitStatus};

/// The full ordered unit set shipped with this build.
pub fn units() -> Vec<Box<dyn MigrationUnit>> {
    vec![Box::new(m0001_init_schema::InitSchema)]
}

#[derive(Debug, Clone)]
pub enum MigrationCommand {
    Up,
    Down { count: usize },
    Status,
}

/// Migration entry point shared by the CLI and tests. Builds the runner from
/// the shipped unit set, executes the command, and logs a before/after
/// summary of the applied set.
pub async fn migrate(
    conn: &DatabaseConnection,
    command: MigrationCommand,
) -> Result<(), MigrateError> {
    let runner = Runner::new(units())?;

    let before = count_applied(conn).await?;
    tracing::info!(
        ?command,
        defined = runner.unit_names().len(),
        applied = before,
        "migration starting"
    );

    match &command {
        MigrationCommand::Up => {
            let report = runner.apply_all(conn).await?;
            tracing::info!(
                applied = report.applied.len(),
                skipped = report.skipped.len(),
                "up complete"
            );
        }
        MigrationCommand::Down { count } => {
            let report = runner.revert_last(conn, *count).await?;
            tracing::info!(reverted = report.reverted.len(), "down complete");
        }
        MigrationCommand::Status => {
            for status in runner.status(conn).await? {
                tracing::info!(
                    unit = %status.name,
                    state = if status.applied { "applied" } else { "pending" }
                );
            }
        }
    }
    Ok(())
}

/// Number of units recorded as applied. Returns 0 when the history table
/// does not exist yet.
pub async fn count_applied(conn: &DatabaseConnection) -> Result<usize, MigrateError> {
    match history::applied_units(conn).await {
        Ok(names) => Ok(names.len()),
        Err(DbErr::Exec(_)) | Err(DbErr::Query(_)) => Ok(0),
        Err(e) => Err(e.into()),
    }
}
