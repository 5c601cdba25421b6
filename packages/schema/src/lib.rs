//! In-memory catalog of the civic-registry database schema.
//!
//! This crate is the single source of truth for table shapes (columns, types,
//! nullability, defaults, uniqueness, foreign keys) and for the closed string
//! vocabularies stored in constrained columns. It performs no database I/O;
//! the migration runner consults it to generate DDL.

pub mod catalog;
pub mod limits;
pub mod registry;
pub mod table;
pub mod vocab;

pub use registry::{SchemaError, SchemaRegistry};
pub use table::{ColumnSpec, ColumnType, DefaultValue, TableDef};
