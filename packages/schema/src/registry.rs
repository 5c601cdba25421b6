//! Table registry with registration-time integrity checks.
//!
//! Registration order is the dependency order: a foreign key may only point
//! at a table (and column) that is already registered, so the registry's
//! table list is always parents-before-children. That makes the ordered list
//! directly usable for DDL generation and, reversed, for teardown.

use std::collections::HashMap;

use thiserror::Error;

use crate::table::{ForeignKeyRef, TableDef};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("table '{name}' is already registered")]
    DuplicateTable { name: String },
    #[error("table '{table}' column '{column}' references unknown target '{target_table}.{target_column}'")]
    UnknownReference {
        table: String,
        column: String,
        target_table: String,
        target_column: String,
    },
    #[error("unknown value '{value}' for vocabulary '{vocabulary}'")]
    UnknownValue {
        vocabulary: &'static str,
        value: String,
    },
}

#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableDef>,
    by_name: HashMap<&'static str, usize>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table. Fails on a duplicate name, or on any foreign key
    /// whose target is not yet registered (self-references are allowed).
    /// No partial registration: the table is only added once fully validated.
    pub fn define(&mut self, table: TableDef) -> Result<(), SchemaError> {
        if self.by_name.contains_key(table.name()) {
            return Err(SchemaError::DuplicateTable {
                name: table.name().to_string(),
            });
        }

        for column in table.columns() {
            if let Some(fk) = column.foreign_key() {
                self.validate_reference(&table, column.name(), fk)?;
            }
        }

        self.by_name.insert(table.name(), self.tables.len());
        self.tables.push(table);
        Ok(())
    }

    fn validate_reference(
        &self,
        table: &TableDef,
        column: &'static str,
        fk: ForeignKeyRef,
    ) -> Result<(), SchemaError> {
        let target = if fk.table == table.name() {
            Some(table)
        } else {
            self.table(fk.table)
        };
        let resolved = target.and_then(|t| t.column(fk.column));
        if resolved.is_none() {
            return Err(SchemaError::UnknownReference {
                table: table.name().to_string(),
                column: column.to_string(),
                target_table: fk.table.to_string(),
                target_column: fk.column.to_string(),
            });
        }
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.by_name.get(name).map(|&i| &self.tables[i])
    }

    /// All tables in registration order: parents before children.
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Resolves the target of `table.column`'s foreign key.
    pub fn resolve_foreign_key(
        &self,
        table: &str,
        column: &str,
    ) -> Result<ForeignKeyRef, SchemaError> {
        let fk = self
            .table(table)
            .and_then(|t| t.column(column))
            .and_then(|c| c.foreign_key());
        match fk {
            Some(fk) if self.table(fk.table).and_then(|t| t.column(fk.column)).is_some() => Ok(fk),
            _ => Err(SchemaError::UnknownReference {
                table: table.to_string(),
                column: column.to_string(),
                target_table: fk.map(|f| f.table.to_string()).unwrap_or_default(),
                target_column: fk.map(|f| f.column.to_string()).unwrap_or_default(),
            }),
        }
    }
}
