use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::db::{sanitize_db_url, DbConfig};
use crate::error::DbInfraError;

const CONNECT_MAX_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_INTERVAL_MS: u64 = 500;

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        "connection_retry=success attempts={} interval_ms={}",
                        attempt, interval_ms
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(
                        "connection_retry=failed attempt={} max_attempts={} interval_ms={}",
                        attempt, max_attempts, interval_ms
                    );
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| DbInfraError::Config {
        message: "no error recorded after max attempts (this should not happen)".to_string(),
    }))
}

fn build_connect_options(config: &DbConfig) -> Result<ConnectOptions, DbInfraError> {
    let url = config.connect_url()?;
    let mut opt = ConnectOptions::new(url);
    opt.max_connections(config.pool_max)
        .idle_timeout(config.idle_timeout)
        .connect_timeout(config.connect_timeout)
        .sqlx_logging(true);
    Ok(opt)
}

/// Opens a pooled connection, retrying transient failures. The TLS policy is
/// resolved from the configured URL before any network I/O happens.
pub async fn connect(config: &DbConfig) -> Result<DatabaseConnection, DbInfraError> {
    let opt = build_connect_options(config)?;
    let sanitized = sanitize_db_url(&config.url);

    let conn = retry_connection(
        || {
            let opt_clone = opt.clone();
            async move {
                Database::connect(opt_clone)
                    .await
                    .map_err(|source| DbInfraError::Connection { source })
            }
        },
        CONNECT_MAX_ATTEMPTS,
        CONNECT_RETRY_INTERVAL_MS,
    )
    .await?;

    info!(url = %sanitized, tls = ?config.tls_mode(), "database connection established");
    Ok(conn)
}

/// Observable lifecycle state of a [`DbManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Uninitialized,
    Connected,
    Degraded,
}

enum Inner {
    Uninitialized,
    Connected(DatabaseConnection),
    Degraded { last_error: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Error,
}

/// Outcome of a health probe. Produced for every probe, including ones that
/// fail to reach the database.
#[derive(Debug, Clone)]
pub struct HealthReport {
    pub connected: bool,
    pub status: HealthStatus,
    pub detail: Option<String>,
}

/// Owns the process-wide connection pool and tracks whether the database is
/// reachable. A failed startup leaves the manager degraded instead of
/// aborting the process; any later access retries the connection.
///
/// Serializing migrations across processes is a deployment concern (run the
/// migration binary as a dedicated step before rollout); the manager itself
/// does not coordinate with other processes.
pub struct DbManager {
    config: DbConfig,
    inner: Mutex<Inner>,
}

impl DbManager {
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::Uninitialized),
        }
    }

    /// Wraps an already-established connection. Used where the pool is built
    /// by other means, such as test harnesses.
    pub fn from_connection(config: DbConfig, conn: DatabaseConnection) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner::Connected(conn)),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub async fn state(&self) -> ManagerState {
        match *self.inner.lock().await {
            Inner::Uninitialized => ManagerState::Uninitialized,
            Inner::Connected(_) => ManagerState::Connected,
            Inner::Degraded { .. } => ManagerState::Degraded,
        }
    }

    /// Eagerly connects. On failure the manager enters the degraded state and
    /// the error is returned to the caller.
    pub async fn init(&self) -> Result<(), DbInfraError> {
        let mut inner = self.inner.lock().await;
        match connect(&self.config).await {
            Ok(conn) => {
                *inner = Inner::Connected(conn);
                Ok(())
            }
            Err(e) => {
                *inner = Inner::Degraded {
                    last_error: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Startup variant that never fails: an unreachable database is logged
    /// and the manager continues degraded, to be retried on first use.
    pub async fn init_or_degrade(&self) {
        if let Err(e) = self.init().await {
            warn!(
                url = %sanitize_db_url(&self.config.url),
                error = %e,
                "database unreachable at startup, continuing degraded"
            );
        }
    }

    /// Returns the live connection, lazily reconnecting if the manager is
    /// uninitialized or degraded. A failed reconnect keeps the manager
    /// degraded with the fresh error.
    pub async fn handle(&self) -> Result<DatabaseConnection, DbInfraError> {
        let mut inner = self.inner.lock().await;
        if let Inner::Connected(conn) = &*inner {
            return Ok(conn.clone());
        }
        match connect(&self.config).await {
            Ok(conn) => {
                info!("database connection recovered");
                *inner = Inner::Connected(conn.clone());
                Ok(conn)
            }
            Err(e) => {
                *inner = Inner::Degraded {
                    last_error: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// Probes the database with a trivial query. Never returns an error: an
    /// unreachable or failing database yields a report with `connected: false`
    /// and moves the manager to degraded.
    pub async fn health_check(&self) -> HealthReport {
        let conn = {
            let inner = self.inner.lock().await;
            match &*inner {
                Inner::Connected(conn) => Some(conn.clone()),
                _ => None,
            }
        };

        let conn = match conn {
            Some(conn) => conn,
            None => match self.handle().await {
                Ok(conn) => conn,
                Err(e) => {
                    return HealthReport {
                        connected: false,
                        status: HealthStatus::Error,
                        detail: Some(e.to_string()),
                    }
                }
            },
        };

        let probe = Statement::from_string(conn.get_database_backend(), "SELECT 1");
        match conn.execute(probe).await {
            Ok(_) => HealthReport {
                connected: true,
                status: HealthStatus::Healthy,
                detail: None,
            },
            Err(e) => {
                let detail = e.to_string();
                let mut inner = self.inner.lock().await;
                *inner = Inner::Degraded {
                    last_error: detail.clone(),
                };
                warn!(error = %detail, "health probe failed");
                HealthReport {
                    connected: false,
                    status: HealthStatus::Error,
                    detail: Some(detail),
                }
            }
        }
    }

    /// Runs a migration command over the managed connection.
    pub async fn run_migrations(&self, command: MigrationCommand) -> Result<(), DbInfraError> {
        let conn = self.handle().await?;
        migrate(&conn, command).await?;
        Ok(())
    }
}

/// One-shot entry point for the migration binary: connect, run the command,
/// drop the pool.
pub async fn orchestrate_migration(
    config: &DbConfig,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    info!(
        url = %sanitize_db_url(&config.url),
        command = ?command,
        "migrate=start"
    );
    let conn = connect(config).await?;
    migrate(&conn, command).await?;
    info!("migrate=done");
    Ok(())
}
