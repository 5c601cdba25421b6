//! Persisted applied-set bookkeeping.
//!
//! One row per applied migration unit, keyed by unit name. The table is
//! created on demand before the first run.

use sea_orm::sea_query::{Alias, ColumnDef, Expr, Query, Table};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};

pub const HISTORY_TABLE: &str = "schema_history";

pub async fn ensure_history_table(conn: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Table::create()
        .table(Alias::new(HISTORY_TABLE))
        .if_not_exists()
        .col(ColumnDef::new(Alias::new("unit_name")).text().not_null().primary_key())
        .col(
            ColumnDef::new(Alias::new("applied_at"))
                .timestamp()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned();
    let backend = conn.get_database_backend();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}

/// Names of all applied units, in ascending name order. Apply order and name
/// order coincide because the runner always applies in name order.
pub async fn applied_units(conn: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    let stmt = Query::select()
        .column(Alias::new("unit_name"))
        .from(Alias::new(HISTORY_TABLE))
        .order_by(Alias::new("unit_name"), sea_orm::Order::Asc)
        .to_owned();
    let backend = conn.get_database_backend();
    let rows = conn.query_all(backend.build(&stmt)).await?;
    rows.iter()
        .map(|row| row.try_get::<String>("", "unit_name"))
        .collect()
}

pub async fn record_applied(conn: &DatabaseConnection, unit_name: &str) -> Result<(), DbErr> {
    let stmt = Query::insert()
        .into_table(Alias::new(HISTORY_TABLE))
        .columns([Alias::new("unit_name")])
        .values_panic([unit_name.into()])
        .to_owned();
    let backend = conn.get_database_backend();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}

pub async fn remove_record(conn: &DatabaseConnection, unit_name: &str) -> Result<(), DbErr> {
    let stmt = Query::delete()
        .from_table(Alias::new(HISTORY_TABLE))
        .and_where(Expr::col(Alias::new("unit_name")).eq(unit_name))
        .to_owned();
    let backend = conn.get_database_backend();
    conn.execute(backend.build(&stmt)).await?;
    Ok(())
}
