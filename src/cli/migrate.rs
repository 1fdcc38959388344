use crate::config::database::{connect_database, migrate_database};

/// Connect to the database and run all pending migrations.
///
/// Does not build `AppData` or start the server.
pub async fn run_migrations(database_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let db = connect_database(database_url).await?;
    migrate_database(&db).await?;

    tracing::info!("All migrations completed successfully");

    Ok(())
}
