use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbInfraError {
    #[error("required environment variable '{name}' is not set")]
    MissingConfig { name: &'static str },
    #[error("configuration error: {message}")]
    Config { message: String },
    #[error("database connection failed: {source}")]
    Connection {
        #[source]
        source: DbErr,
    },
    #[error("migration failed: {source}")]
    Migration {
        #[from]
        source: migration::MigrateError,
    },
}
