//! Schema migration CLI.
//!
//! `migration up`, `migration down`, `migration status`, ... against `DATABASE_URL`.

use sea_orm_migration::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm_migration=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        migrations = migration::Migrator::migrations().len(),
        "Running yatube schema migrations"
    );
    cli::run_cli(migration::Migrator).await;
}
