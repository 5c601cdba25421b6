use clap::{Parser, Subcommand};
use db_infra::config::db::DbConfig;
use db_infra::infra::db::orchestrate_migration;
use migration::MigrationCommand;

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Civic registry database migration tool")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Revert the most recently applied migrations
    Down {
        /// How many applied units to revert
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
    /// Show which units are applied and which are pending
    Status,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_env_filter("migration=info,db_infra=info,sqlx=warn")
        .init();

    let args = Args::parse();

    let command = match args.command {
        Command::Up => MigrationCommand::Up,
        Command::Down { count } => MigrationCommand::Down { count },
        Command::Status => MigrationCommand::Status,
    };

    // Configuration problems must surface before any network I/O.
    let config = match DbConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = orchestrate_migration(&config, command).await {
        eprintln!("Migration failed: {e}");
        std::process::exit(1);
    }
}
