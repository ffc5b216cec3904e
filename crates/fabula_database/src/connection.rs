//! Database connection utilities.

use crate::DatabaseResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use fabula_error::{DatabaseError, DatabaseErrorKind};

/// Migrations bundled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Establish a connection to the PostgreSQL database.
///
/// Reads the `DATABASE_URL` environment variable to determine the connection
/// string, loading a `.env` file first if one is present.
///
/// # Errors
///
/// Returns an error if:
/// - `DATABASE_URL` environment variable is not set
/// - Connection to the database fails
pub fn establish_connection() -> DatabaseResult<PgConnection> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::new(DatabaseErrorKind::Connection(
            "DATABASE_URL environment variable not set".to_string(),
        ))
    })?;

    PgConnection::establish(&database_url)
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))
}

/// Run any pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub fn run_migrations(conn: &mut PgConnection) -> DatabaseResult<()> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|_| ())
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))
}
