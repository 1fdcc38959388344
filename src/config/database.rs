use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::errors::InternalError;
use crate::errors::internal::DatabaseError;

/// Connect to the database
///
/// Does NOT run migrations - call `migrate_database()` separately.
pub async fn connect_database(database_url: &str) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| InternalError::database("connect_database", e))?;

    tracing::debug!("Connected to database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations on the provided database connection
pub async fn migrate_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Database migrations completed");

    Ok(())
}

/// Open the transaction a request runs in
pub async fn begin_transaction(db: &DatabaseConnection) -> Result<DatabaseTransaction, InternalError> {
    db.begin()
        .await
        .map_err(|source| InternalError::Database(DatabaseError::TransactionBegin { source }))
}

/// Commit a request transaction. Dropping a transaction without calling this rolls it back.
pub async fn commit_transaction(txn: DatabaseTransaction) -> Result<(), InternalError> {
    txn.commit()
        .await
        .map_err(|source| InternalError::Database(DatabaseError::TransactionCommit { source }))
}
