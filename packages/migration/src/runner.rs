//! Ordered application of migration units with persisted bookkeeping.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};
use thiserror::Error;
use tracing::{error, info};

use crate::history;

/// A single named schema-change unit with symmetric forward and reverse
/// operations. Names carry a zero-padded numeric prefix (`NNNN_description`)
/// that establishes total apply order.
///
/// `apply` must be safe to re-run (create-if-not-exists semantics) as a
/// defense against partially recorded history; `revert` must drop exactly
/// the objects `apply` created, children before parents.
#[async_trait]
pub trait MigrationUnit: Send + Sync {
    fn name(&self) -> &str;
    async fn apply(&self, conn: &DatabaseConnection) -> Result<(), DbErr>;
    async fn revert(&self, conn: &DatabaseConnection) -> Result<(), DbErr>;
}

#[derive(Debug, Error)]
pub enum MigrateError {
    #[error("duplicate migration unit name: {name}")]
    DuplicateUnit { name: String },
    #[error("history names unit '{name}' which is not defined by this runner")]
    UnknownUnit { name: String },
    #[error("migration unit '{unit}' failed: {source}")]
    UnitFailed {
        unit: String,
        #[source]
        source: DbErr,
    },
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Outcome of an `apply_all` pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

/// Outcome of a `revert_last` pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RevertReport {
    pub reverted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitStatus {
    pub name: String,
    pub applied: bool,
}

pub struct Runner {
    units: Vec<Box<dyn MigrationUnit>>,
}

impl Runner {
    /// Validates and orders the unit set. Units are sorted into ascending
    /// name order regardless of the order supplied; duplicate names are a
    /// configuration error detected here, before any database I/O.
    pub fn new(mut units: Vec<Box<dyn MigrationUnit>>) -> Result<Self, MigrateError> {
        units.sort_by(|a, b| a.name().cmp(b.name()));
        for pair in units.windows(2) {
            if pair[0].name() == pair[1].name() {
                return Err(MigrateError::DuplicateUnit {
                    name: pair[0].name().to_string(),
                });
            }
        }
        Ok(Self { units })
    }

    pub fn unit_names(&self) -> Vec<&str> {
        self.units.iter().map(|u| u.name()).collect()
    }

    /// Applies every unit not yet recorded in the history table, in ascending
    /// name order. A unit failure halts the pass: later units are not
    /// attempted and prior units are not rolled back (DDL is frequently
    /// non-transactional in the target engine; recovery is manual).
    ///
    /// Concurrent runs from separate processes are not coordinated here;
    /// deployments must serialize migration runs externally.
    pub async fn apply_all(&self, conn: &DatabaseConnection) -> Result<ApplyReport, MigrateError> {
        history::ensure_history_table(conn).await?;
        let applied: BTreeSet<String> = history::applied_units(conn).await?.into_iter().collect();

        let mut report = ApplyReport::default();
        for unit in &self.units {
            if applied.contains(unit.name()) {
                info!(unit = unit.name(), "already applied, skipping");
                report.skipped.push(unit.name().to_string());
                continue;
            }
            info!(unit = unit.name(), "applying");
            unit.apply(conn).await.map_err(|source| {
                error!(unit = unit.name(), %source, "apply failed, halting run");
                MigrateError::UnitFailed {
                    unit: unit.name().to_string(),
                    source,
                }
            })?;
            history::record_applied(conn, unit.name()).await?;
            report.applied.push(unit.name().to_string());
        }
        info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "migration pass complete"
        );
        Ok(report)
    }

    /// Reverts the most recently applied `count` units in reverse apply
    /// order. Each unit is reverted independently: its history row is removed
    /// once its `revert` succeeds, and a failure halts further reverts.
    pub async fn revert_last(
        &self,
        conn: &DatabaseConnection,
        count: usize,
    ) -> Result<RevertReport, MigrateError> {
        history::ensure_history_table(conn).await?;
        let applied = history::applied_units(conn).await?;

        let mut report = RevertReport::default();
        for name in applied.iter().rev().take(count) {
            let unit = self
                .units
                .iter()
                .find(|u| u.name() == name)
                .ok_or_else(|| MigrateError::UnknownUnit { name: name.clone() })?;
            info!(unit = unit.name(), "reverting");
            unit.revert(conn).await.map_err(|source| {
                error!(unit = unit.name(), %source, "revert failed, halting run");
                MigrateError::UnitFailed {
                    unit: unit.name().to_string(),
                    source,
                }
            })?;
            history::remove_record(conn, unit.name()).await?;
            report.reverted.push(unit.name().to_string());
        }
        info!(reverted = report.reverted.len(), "revert pass complete");
        Ok(report)
    }

    /// Per-unit applied/pending report, in apply order.
    pub async fn status(&self, conn: &DatabaseConnection) -> Result<Vec<UnitStatus>, MigrateError> {
        history::ensure_history_table(conn).await?;
        let applied: BTreeSet<String> = history::applied_units(conn).await?.into_iter().collect();
        Ok(self
            .units
            .iter()
            .map(|u| UnitStatus {
                name: u.name().to_string(),
                applied: applied.contains(u.name()),
            })
            .collect())
    }
}
