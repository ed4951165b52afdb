// Copyright 2023 Remi Bernotavicius

use diesel::prelude::Connection as _;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::error::Error;
use std::path::Path;

pub mod models;
pub mod schema;

pub type Connection = diesel::sqlite::SqliteConnection;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub fn establish_connection(
    path: impl AsRef<Path>,
) -> Result<Connection, Box<dyn Error + Send + Sync + 'static>> {
    let mut connection = Connection::establish(path.as_ref().to_str().unwrap())?;
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(connection)
}

#[cfg(test)]
pub fn establish_in_memory_connection() -> Connection {
    let mut connection = Connection::establish(":memory:").unwrap();
    connection.run_pending_migrations(MIGRATIONS).unwrap();
    connection
}
