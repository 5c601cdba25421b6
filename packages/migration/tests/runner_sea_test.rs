//! Runner behavior against a mock connection, asserted via the statement log.

use std::collections::BTreeMap;

use async_trait::async_trait;
use migration::{MigrateError, MigrationUnit, Runner};
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult,
    Statement, Value,
};

fn exec_ok() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

fn empty_applied_set() -> Vec<BTreeMap<&'static str, Value>> {
    Vec::new()
}

fn applied_row(name: &str) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("unit_name", Value::from(name))])
}

fn logged_sql(conn: DatabaseConnection) -> Vec<String> {
    conn.into_transaction_log()
        .into_iter()
        .map(|txn| format!("{txn:?}"))
        .collect()
}

/// Test unit that executes one CREATE TABLE for a table named after itself.
struct OneTable {
    name: &'static str,
    table: &'static str,
}

#[async_trait]
impl MigrationUnit for OneTable {
    fn name(&self) -> &str {
        self.name
    }

    async fn apply(&self, conn: &DatabaseConnection) -> Result<(), DbErr> {
        let backend = conn.get_database_backend();
        conn.execute(Statement::from_string(
            backend,
            format!("CREATE TABLE IF NOT EXISTS \"{}\" (\"id\" text)", self.table),
        ))
        .await?;
        Ok(())
    }

    async fn revert(&self, conn: &DatabaseConnection) -> Result<(), DbErr> {
        let backend = conn.get_database_backend();
        conn.execute(Statement::from_string(
            backend,
            format!("DROP TABLE IF EXISTS \"{}\"", self.table),
        ))
        .await?;
        Ok(())
    }
}

/// Test unit whose apply always fails without touching the database.
struct Broken(&'static str);

#[async_trait]
impl MigrationUnit for Broken {
    fn name(&self) -> &str {
        self.0
    }

    async fn apply(&self, _conn: &DatabaseConnection) -> Result<(), DbErr> {
        Err(DbErr::Custom("induced failure".into()))
    }

    async fn revert(&self, _conn: &DatabaseConnection) -> Result<(), DbErr> {
        Err(DbErr::Custom("induced failure".into()))
    }
}

#[tokio::test]
async fn apply_all_runs_units_in_name_order_regardless_of_supplied_order() {
    // 2 unit DDL execs + ensure-history + 2 history inserts
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results((0..5).map(|_| exec_ok()))
        .append_query_results([empty_applied_set()])
        .into_connection();

    let runner = Runner::new(vec![
        Box::new(OneTable {
            name: "0002_conversations",
            table: "conversations",
        }),
        Box::new(OneTable {
            name: "0001_users",
            table: "users",
        }),
    ])
    .unwrap();

    let report = runner.apply_all(&conn).await.unwrap();
    assert_eq!(report.applied, ["0001_users", "0002_conversations"]);
    assert!(report.skipped.is_empty());

    let sql = logged_sql(conn);
    let users_pos = sql
        .iter()
        .position(|s| s.contains("CREATE TABLE IF NOT EXISTS \\\"users\\\""))
        .expect("users DDL logged");
    let conversations_pos = sql
        .iter()
        .position(|s| s.contains("CREATE TABLE IF NOT EXISTS \\\"conversations\\\""))
        .expect("conversations DDL logged");
    assert!(users_pos < conversations_pos);
}

#[tokio::test]
async fn second_apply_all_issues_no_ddl() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok()]) // ensure-history only
        .append_query_results([vec![applied_row("0001_users")]])
        .into_connection();

    let runner = Runner::new(vec![Box::new(OneTable {
        name: "0001_users",
        table: "users",
    }) as Box<dyn MigrationUnit>])
    .unwrap();

    let report = runner.apply_all(&conn).await.unwrap();
    assert!(report.applied.is_empty());
    assert_eq!(report.skipped, ["0001_users"]);

    // ensure-history + applied-set select, nothing else
    assert_eq!(logged_sql(conn).len(), 2);
}

#[tokio::test]
async fn failure_halts_the_run_and_names_the_unit() {
    // ensure-history + first unit's history insert
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results((0..3).map(|_| exec_ok()))
        .append_query_results([empty_applied_set()])
        .into_connection();

    let runner = Runner::new(vec![
        Box::new(OneTable {
            name: "0001_users",
            table: "users",
        }) as Box<dyn MigrationUnit>,
        Box::new(Broken("0002_boom")),
        Box::new(OneTable {
            name: "0003_never",
            table: "never",
        }),
    ])
    .unwrap();

    let err = runner.apply_all(&conn).await.unwrap_err();
    assert!(matches!(err, MigrateError::UnitFailed { unit, .. } if unit == "0002_boom"));

    let sql = logged_sql(conn);
    // unit 0001 was applied and recorded, unit 0003 was never attempted
    assert!(sql.iter().any(|s| s.contains("\\\"users\\\"")));
    assert!(sql.iter().any(|s| s.contains("INSERT INTO \\\"schema_history\\\"")));
    assert!(!sql.iter().any(|s| s.contains("\\\"never\\\"")));
}

#[tokio::test]
async fn revert_runs_in_reverse_order_and_clears_history() {
    // 2 drops + ensure-history + 2 history deletes
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results((0..5).map(|_| exec_ok()))
        .append_query_results([vec![applied_row("0001_users"), applied_row("0002_conversations")]])
        .into_connection();

    let runner = Runner::new(vec![
        Box::new(OneTable {
            name: "0001_users",
            table: "users",
        }) as Box<dyn MigrationUnit>,
        Box::new(OneTable {
            name: "0002_conversations",
            table: "conversations",
        }),
    ])
    .unwrap();

    let report = runner.revert_last(&conn, 2).await.unwrap();
    assert_eq!(report.reverted, ["0002_conversations", "0001_users"]);

    let sql = logged_sql(conn);
    let conversations_pos = sql
        .iter()
        .position(|s| s.contains("DROP TABLE IF EXISTS \\\"conversations\\\""))
        .expect("conversations drop logged");
    let users_pos = sql
        .iter()
        .position(|s| s.contains("DROP TABLE IF EXISTS \\\"users\\\""))
        .expect("users drop logged");
    assert!(conversations_pos < users_pos);
    assert!(sql.iter().any(|s| s.contains("DELETE FROM \\\"schema_history\\\"")));
}

#[tokio::test]
async fn revert_of_an_unknown_history_entry_is_an_error() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_ok()])
        .append_query_results([vec![applied_row("0009_mystery")]])
        .into_connection();

    let runner = Runner::new(vec![Box::new(OneTable {
        name: "0001_users",
        table: "users",
    }) as Box<dyn MigrationUnit>])
    .unwrap();

    let err = runner.revert_last(&conn, 1).await.unwrap_err();
    assert!(matches!(err, MigrateError::UnknownUnit { name } if name == "0009_mystery"));
}

#[tokio::test]
async fn init_schema_round_trip_creates_then_drops_every_table() {
    let registry = schema::catalog::builtin().unwrap();
    let table_count = registry.tables().len();

    // apply: ensure-history + N creates + history insert
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results((0..table_count + 2).map(|_| exec_ok()))
        .append_query_results([empty_applied_set()])
        .into_connection();

    let runner = Runner::new(migration::units()).unwrap();
    let report = runner.apply_all(&conn).await.unwrap();
    assert_eq!(report.applied, ["0001_init_schema"]);

    let sql = logged_sql(conn);
    let first_create = sql
        .iter()
        .position(|s| s.contains("CREATE TABLE IF NOT EXISTS \\\"users\\\""))
        .expect("users created");
    let last_create = sql
        .iter()
        .position(|s| s.contains("CREATE TABLE IF NOT EXISTS \\\"assistant_commands\\\""))
        .expect("assistant_commands created");
    assert!(first_create < last_create);

    // revert: ensure-history + N drops + history delete
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results((0..table_count + 2).map(|_| exec_ok()))
        .append_query_results([vec![applied_row("0001_init_schema")]])
        .into_connection();

    let runner = Runner::new(migration::units()).unwrap();
    let report = runner.revert_last(&conn, 1).await.unwrap();
    assert_eq!(report.reverted, ["0001_init_schema"]);

    let sql = logged_sql(conn);
    let drops: Vec<usize> = registry
        .tables()
        .iter()
        .map(|t| {
            sql.iter()
                .position(|s| s.contains(&format!("DROP TABLE IF EXISTS \\\"{}\\\"", t.name())))
                .unwrap_or_else(|| panic!("{} was not dropped", t.name()))
        })
        .collect();
    // parents dropped strictly after their children
    for pair in drops.windows(2) {
        assert!(pair[0] > pair[1]);
    }
}

#[tokio::test]
async fn count_applied_is_zero_before_the_history_table_exists() {
    let conn = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Query(sea_orm::RuntimeErr::Internal(
            "relation \"schema_history\" does not exist".into(),
        ))])
        .into_connection();

    assert_eq!(migration::count_applied(&conn).await.unwrap(), 0);
}
