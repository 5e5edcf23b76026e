//! Seeds the database with sales from an external JSON feed.
//!
//! Seeding is not idempotent: every call inserts the whole feed again, so
//! seeding twice stores every sale twice.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    sale::{Sale, SaleBuilder, count_sales, create_sales},
};

/// The feed the database is seeded from by default.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// One item of the seed feed.
///
/// Keys other than the ones below (e.g. `id`, `image`, `sold`) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedRecord {
    /// The name of the product.
    #[serde(default, alias = "productTitle")]
    pub title: String,
    /// A longer description of the product.
    #[serde(default, alias = "productDescription")]
    pub description: String,
    /// The price of the product, given either as a number or numeric text.
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: f64,
    /// The category of the product.
    #[serde(default)]
    pub category: String,
    /// When the product was sold, as an RFC 3339 date-time.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
}

impl From<SeedRecord> for SaleBuilder {
    fn from(record: SeedRecord) -> Self {
        Sale::build(&record.title, record.price, record.date_of_sale)
            .description(&record.description)
            .category(&record.category)
    }
}

fn deserialize_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    let price = match Price::deserialize(deserializer)? {
        Price::Number(price) => price,
        Price::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid price \"{text}\"")))?,
    };

    if !price.is_finite() || price < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "price must be a non-negative number, got {price}"
        )));
    }

    Ok(price)
}

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection the sales are inserted into.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client used to download the feed.
    pub http_client: reqwest::Client,
    /// Where to download the feed from.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// Download the seed feed and insert every sale in it.
///
/// Responds with 201 Created once all the sales are stored. Any failure to
/// fetch or decode the feed is reported as a generic 500 error, and nothing
/// is inserted.
pub async fn initialize_endpoint(
    State(state): State<SeedState>,
) -> Result<(StatusCode, &'static str), Error> {
    let records = fetch_seed_records(&state.http_client, &state.seed_url).await?;
    let fetched = records.len();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let inserted = insert_seed_records(records, &connection)
        .inspect_err(|error| tracing::error!("could not insert seed data: {error}"))?;

    tracing::info!("Seeded database with {inserted} of {fetched} sales from {}", state.seed_url);
    match count_sales(&connection) {
        Ok(total) => tracing::info!("Database now holds {total} sales"),
        Err(error) => tracing::warn!("could not count sales after seeding: {error}"),
    }

    Ok((StatusCode::CREATED, "Database initialized with seed data."))
}

/// Download and decode the seed feed at `url`.
///
/// # Errors
/// Returns a:
/// - [Error::SeedFetch] if the request fails or the server responds with an error status,
/// - or [Error::SeedDecode] if the body is not a JSON array of [SeedRecord]s.
pub(crate) async fn fetch_seed_records(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<SeedRecord>, Error> {
    tracing::debug!("Fetching seed data from {url}");

    let body = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|error| Error::SeedFetch(error.to_string()))?
        .bytes()
        .await
        .map_err(|error| Error::SeedFetch(error.to_string()))?;

    parse_seed_records(&body)
}

/// Decode a JSON array of [SeedRecord]s.
///
/// # Errors
/// Returns [Error::SeedDecode] if `json` is not a JSON array of [SeedRecord]s.
pub fn parse_seed_records(json: &[u8]) -> Result<Vec<SeedRecord>, Error> {
    serde_json::from_slice(json).map_err(|error| Error::SeedDecode(error.to_string()))
}

/// Insert every record as a new sale in a single SQL transaction.
///
/// Returns the number of sales inserted.
///
/// # Errors
/// Returns [Error::SqlError] if the sales could not be inserted, in which
/// case none of them are.
pub fn insert_seed_records(records: Vec<SeedRecord>, connection: &Connection) -> Result<usize, Error> {
    create_sales(records.into_iter().map(SaleBuilder::from), connection)
}
