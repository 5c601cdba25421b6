//! `0001_init_schema`: creates every table in the built-in catalog.
//!
//! DDL is generated from the schema registry, so the creation order is the
//! registry's parents-before-children order and the revert order is its
//! exact reverse. The revert drops only the tables this unit created.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::debug;

use crate::runner::MigrationUnit;

pub struct InitSchema;

impl InitSchema {
    fn registry() -> Result<schema::SchemaRegistry, DbErr> {
        schema::catalog::builtin().map_err(|e| DbErr::Custom(format!("schema catalog invalid: {e}")))
    }
}

#[async_trait]
impl MigrationUnit for InitSchema {
    fn name(&self) -> &str {
        "0001_init_schema"
    }

    async fn apply(&self, conn: &DatabaseConnection) -> Result<(), DbErr> {
        let registry = Self::registry()?;
        let backend = conn.get_database_backend();
        for table in registry.tables() {
            conn.execute(backend.build(&table.create_statement())).await?;
            for index in table.index_statements() {
                conn.execute(backend.build(&index)).await?;
            }
            debug!(table = table.name(), "created");
        }
        Ok(())
    }

    async fn revert(&self, conn: &DatabaseConnection) -> Result<(), DbErr> {
        let registry = Self::registry()?;
        let backend = conn.get_database_backend();
        // children before parents, to satisfy foreign-key drop constraints
        for table in registry.tables().iter().rev() {
            conn.execute(backend.build(&table.drop_statement())).await?;
            debug!(table = table.name(), "dropped");
        }
        Ok(())
    }
}
