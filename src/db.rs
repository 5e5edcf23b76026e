//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, sale::create_sale_table};

/// Create all the tables the application needs.
///
/// Safe to call on a database that has already been initialized, existing
/// tables and data are left untouched.
///
/// # Errors
/// Returns an [Error::SqlError] if the tables cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_sale_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
