//! Declarative table definitions and their lowering to `sea_query` DDL.

use sea_orm::sea_query::{
    Alias, ColumnDef, Expr, ForeignKey, Index, IndexCreateStatement, Table, TableCreateStatement,
    TableDropStatement,
};

/// Column types supported by the schema surface. Deliberately small: the
/// catalog only uses what the target engine's DDL contract requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    VarChar(u32),
    Integer,
    Double,
    Boolean,
    Timestamp,
    Json,
}

/// Column default, rendered into the `DEFAULT` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Bool(bool),
    Int(i64),
    /// `now()` at insert time.
    CurrentTimestamp,
}

/// A foreign-key reference to another table's column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKeyRef {
    pub table: &'static str,
    pub column: &'static str,
}

/// A single typed column. Columns are nullable unless marked otherwise;
/// the primary key is implicitly non-null.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    name: &'static str,
    ty: ColumnType,
    not_null: bool,
    primary_key: bool,
    unique: bool,
    default: Option<DefaultValue>,
    references: Option<ForeignKeyRef>,
}

impl ColumnSpec {
    pub fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            not_null: false,
            primary_key: false,
            unique: false,
            default: None,
            references: None,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, ColumnType::Text)
    }

    pub fn var_char(name: &'static str, len: u32) -> Self {
        Self::new(name, ColumnType::VarChar(len))
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, ColumnType::Integer)
    }

    pub fn double(name: &'static str) -> Self {
        Self::new(name, ColumnType::Double)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, ColumnType::Boolean)
    }

    pub fn timestamp(name: &'static str) -> Self {
        Self::new(name, ColumnType::Timestamp)
    }

    pub fn json(name: &'static str) -> Self {
        Self::new(name, ColumnType::Json)
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks this column as the primary key. Keys are application-generated
    /// opaque strings, never database sequences.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn default_now(self) -> Self {
        self.default(DefaultValue::CurrentTimestamp)
    }

    /// Declares a foreign key to `table.column`. Validated when the owning
    /// table is registered.
    pub fn references(mut self, table: &'static str, column: &'static str) -> Self {
        self.references = Some(ForeignKeyRef { table, column });
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.ty
    }

    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    pub fn foreign_key(&self) -> Option<ForeignKeyRef> {
        self.references
    }

    fn lower(&self) -> ColumnDef {
        let mut col = ColumnDef::new(Alias::new(self.name));
        match self.ty {
            ColumnType::Text => col.text(),
            ColumnType::VarChar(len) => col.string_len(len),
            ColumnType::Integer => col.integer(),
            ColumnType::Double => col.double(),
            ColumnType::Boolean => col.boolean(),
            ColumnType::Timestamp => col.timestamp(),
            ColumnType::Json => col.json_binary(),
        };
        if self.not_null {
            col.not_null();
        }
        if self.primary_key {
            col.primary_key();
        }
        if self.unique {
            col.unique_key();
        }
        match &self.default {
            Some(DefaultValue::Text(v)) => {
                col.default(*v);
            }
            Some(DefaultValue::Bool(v)) => {
                col.default(*v);
            }
            Some(DefaultValue::Int(v)) => {
                col.default(*v);
            }
            Some(DefaultValue::CurrentTimestamp) => {
                col.default(Expr::current_timestamp());
            }
            None => {}
        }
        col
    }
}

/// A named relational entity: ordered columns plus optional multi-column
/// uniqueness constraints (single-column uniqueness lives on the column).
#[derive(Debug, Clone)]
pub struct TableDef {
    name: &'static str,
    columns: Vec<ColumnSpec>,
    unique_together: Vec<Vec<&'static str>>,
}

impl TableDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            columns: Vec::new(),
            unique_together: Vec::new(),
        }
    }

    pub fn col(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a multi-column uniqueness constraint, lowered to a unique index
    /// named `ux_<table>_<col>_<col>...`.
    pub fn unique_together(mut self, columns: &[&'static str]) -> Self {
        self.unique_together.push(columns.to_vec());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key_column(&self) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Tables this one references through foreign keys (may repeat).
    pub fn referenced_tables(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().filter_map(|c| c.references.map(|r| r.table))
    }

    /// `CREATE TABLE IF NOT EXISTS` statement, including inline foreign keys.
    /// `if_not_exists` keeps re-runs safe against partially recorded history.
    pub fn create_statement(&self) -> TableCreateStatement {
        let mut stmt = Table::create();
        stmt.table(Alias::new(self.name)).if_not_exists();
        for column in &self.columns {
            stmt.col(column.lower());
        }
        for column in &self.columns {
            if let Some(fk) = column.references {
                stmt.foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{}_{}", self.name, column.name))
                        .from(Alias::new(self.name), Alias::new(column.name))
                        .to(Alias::new(fk.table), Alias::new(fk.column)),
                );
            }
        }
        stmt.to_owned()
    }

    /// Unique indexes for the multi-column constraints.
    pub fn index_statements(&self) -> Vec<IndexCreateStatement> {
        self.unique_together
            .iter()
            .map(|cols| {
                let mut idx = Index::create();
                idx.name(format!("ux_{}_{}", self.name, cols.join("_")))
                    .table(Alias::new(self.name))
                    .unique()
                    .if_not_exists();
                for col in cols {
                    idx.col(Alias::new(*col));
                }
                idx.to_owned()
            })
            .collect()
    }

    /// `DROP TABLE IF EXISTS` for this table only. Callers are responsible
    /// for ordering drops children-before-parents.
    pub fn drop_statement(&self) -> TableDropStatement {
        Table::drop()
            .table(Alias::new(self.name))
            .if_exists()
            .to_owned()
    }
}
