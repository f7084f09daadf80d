//! # Seed
//!
//! Prepares a fresh database: runs the migrations, then inserts the default
//! settings, the `admin` and `user` permission groups and the admin account.
//! Safe to run repeatedly.
//!
//! ## Usage
//! ```bash
//! DATABASE_URL=postgres://localhost/shopicano \
//! SEED_ADMIN_EMAIL=admin@example.com SEED_ADMIN_PASSWORD=secret \
//! cargo run --bin seed
//! ```

use shopicano::{config::Config, db, services::bootstrap};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let report = bootstrap::seed(&pool, &config.seed_admin_email, &config.seed_admin_password).await?;

    if !report.admin_created {
        tracing::warn!(email = %config.seed_admin_email, "admin already exists, password left unchanged");
    }

    Ok(())
}
