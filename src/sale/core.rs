//! Defines the core data model and database functions for sale records.

use rusqlite::{Connection, Row, Transaction as SqlTransaction};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::SaleId};

// ============================================================================
// MODELS
// ============================================================================

/// A product that was put up for sale, and the date it was sold.
///
/// To create a new `Sale`, use [Sale::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// The ID of the sale.
    pub id: SaleId,
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The price of the product. A price of zero means the product did not sell.
    pub price: f64,
    /// The free-text category of the product, e.g. "electronics".
    pub category: String,
    /// When the product was sold, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl Sale {
    /// Create a new sale.
    ///
    /// Shortcut for [SaleBuilder] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> SaleBuilder {
        SaleBuilder {
            title: title.to_owned(),
            description: String::new(),
            price,
            category: String::new(),
            date_of_sale,
        }
    }
}

/// A builder for creating [Sale] instances.
///
/// The description and category default to empty strings.
///
/// # Examples
///
/// ```ignore
/// use time::macros::datetime;
///
/// use crate::sale::Sale;
///
/// let builder = Sale::build("Fjallraven Backpack", 329.85, datetime!(2021-03-27 20:29:54 +05:30))
///     .description("Fits 15 inch laptops")
///     .category("men's clothing");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct SaleBuilder {
    /// The name of the product.
    pub title: String,
    /// A longer text description of the product.
    pub description: String,
    /// The price of the product.
    pub price: f64,
    /// The free-text category of the product.
    pub category: String,
    /// When the product was sold.
    ///
    /// The offset is converted to UTC when the sale is stored, so the month
    /// used for filtering is the UTC month.
    pub date_of_sale: OffsetDateTime,
}

impl SaleBuilder {
    /// Set the description of the product.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category of the product.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const INSERT_SALE: &str = "INSERT INTO sale (title, description, price, category, date_of_sale)
     VALUES (?1, ?2, ?3, ?4, ?5)
     RETURNING id, title, description, price, category, date_of_sale";

/// Create a new sale in the database from a builder.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_sale(builder: SaleBuilder, connection: &Connection) -> Result<Sale, Error> {
    let sale = connection.prepare_cached(INSERT_SALE)?.query_row(
        (
            builder.title,
            builder.description,
            builder.price,
            builder.category,
            builder.date_of_sale.to_offset(UtcOffset::UTC),
        ),
        map_sale_row,
    )?;

    Ok(sale)
}

/// Insert many sales at once.
///
/// The sales are inserted in a single SQL transaction: either all of them
/// are stored or, on error, none of them are. No attempt is made to detect
/// duplicates, inserting the same builders twice stores them twice.
///
/// Returns the number of sales inserted.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_sales(
    builders: impl IntoIterator<Item = SaleBuilder>,
    connection: &Connection,
) -> Result<usize, Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Immediate)?;

    let mut inserted = 0;
    for builder in builders {
        create_sale(builder, &transaction)?;
        inserted += 1;
    }

    transaction.commit()?;

    Ok(inserted)
}

/// Get the total number of sales in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_sales(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM sale;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the sale table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_sale_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS sale (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                date_of_sale TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Sale.
pub fn map_sale_row(row: &Row) -> Result<Sale, rusqlite::Error> {
    let id = row.get(0)?;
    let title = row.get(1)?;
    let description = row.get(2)?;
    let price = row.get(3)?;
    let category = row.get(4)?;
    let date_of_sale = row.get(5)?;

    Ok(Sale {
        id,
        title,
        description,
        price,
        category,
        date_of_sale,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use time::macros::datetime;

    use crate::{
        sale::{Sale, count_sales, create_sale, create_sales},
        test_utils::get_test_connection,
    };

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();

        let result = create_sale(
            Sale::build("Backpack", 109.95, datetime!(2021-03-27 20:29:54 UTC))
                .description("Fits 15 inch laptops")
                .category("men's clothing"),
            &conn,
        );

        match result {
            Ok(sale) => {
                assert_eq!(sale.id, 1);
                assert_eq!(sale.title, "Backpack");
                assert_eq!(sale.description, "Fits 15 inch laptops");
                assert_eq!(sale.price, 109.95);
                assert_eq!(sale.category, "men's clothing");
                assert_eq!(sale.date_of_sale, datetime!(2021-03-27 20:29:54 UTC));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_stores_date_in_utc() {
        let conn = get_test_connection();

        let sale = create_sale(
            Sale::build("", 1.0, datetime!(2021-04-01 02:00:00 +05:30)),
            &conn,
        )
        .expect("Could not create sale");

        assert_eq!(sale.date_of_sale, datetime!(2021-03-31 20:30:00 UTC));
        assert_eq!(sale.date_of_sale.offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn create_many_inserts_all() {
        let conn = get_test_connection();
        let builders =
            (1..=5).map(|i| Sale::build(&format!("item #{i}"), i as f64, datetime!(2022-01-01 0:00 UTC)));

        let inserted = create_sales(builders, &conn).expect("Could not create sales");

        assert_eq!(inserted, 5);
        assert_eq!(count_sales(&conn).unwrap(), 5);
    }

    #[test]
    fn create_many_twice_duplicates() {
        let conn = get_test_connection();
        let builders = vec![
            Sale::build("a", 1.0, datetime!(2022-01-01 0:00 UTC)),
            Sale::build("b", 2.0, datetime!(2022-01-02 0:00 UTC)),
        ];

        create_sales(builders.clone(), &conn).unwrap();
        create_sales(builders, &conn).unwrap();

        assert_eq!(count_sales(&conn).unwrap(), 4);
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_sale(
                Sale::build("", i as f64, datetime!(2022-10-05 12:00 UTC)),
                &conn,
            )
            .expect("Could not create sale");
        }

        let got_count = count_sales(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
