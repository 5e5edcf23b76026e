//! A histogram of the prices of the sales in a month.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::{Connection, params_from_iter};
use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    Error,
    sale::{MonthQuery, SaleFilter},
};

use super::StatisticsState;

/// A price interval in the histogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBand {
    /// The label used as the key in the JSON output, e.g. "100-200".
    pub label: &'static str,
    /// The inclusive lower bound of the band.
    pub min: f64,
    /// The exclusive upper bound of the band, `None` for the last band.
    pub max: Option<f64>,
}

impl PriceBand {
    const fn new(label: &'static str, min: f64, max: Option<f64>) -> Self {
        Self { label, min, max }
    }

    /// The SQL condition for a sale's price falling in this band.
    ///
    /// The band starting at zero also holds negative prices.
    fn sql_condition(&self) -> String {
        match (self.min > 0.0, self.max) {
            (false, Some(max)) => format!("price < {max}"),
            (true, Some(max)) => format!("price >= {min} AND price < {max}", min = self.min),
            (false, None) => "1".to_owned(),
            (true, None) => format!("price >= {min}", min = self.min),
        }
    }
}

/// The fixed price bands, in ascending order.
///
/// Prices below zero are counted in the first band so that every sale is in
/// exactly one band.
pub const PRICE_BANDS: [PriceBand; 10] = [
    PriceBand::new("0-100", 0.0, Some(100.0)),
    PriceBand::new("100-200", 100.0, Some(200.0)),
    PriceBand::new("200-300", 200.0, Some(300.0)),
    PriceBand::new("300-400", 300.0, Some(400.0)),
    PriceBand::new("400-500", 400.0, Some(500.0)),
    PriceBand::new("500-600", 500.0, Some(600.0)),
    PriceBand::new("600-700", 600.0, Some(700.0)),
    PriceBand::new("700-800", 700.0, Some(800.0)),
    PriceBand::new("800-900", 800.0, Some(900.0)),
    PriceBand::new("900-above", 900.0, None),
];

/// The number of sales in each of the [PRICE_BANDS].
///
/// Serializes as a JSON object with every band label as a key, in ascending
/// band order. Bands without any sales have a count of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBandCounts {
    counts: [u64; PRICE_BANDS.len()],
}

impl PriceBandCounts {
    /// Iterate over the bands and their counts in ascending band order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static PriceBand, u64)> + '_ {
        PRICE_BANDS.iter().zip(self.counts.iter().copied())
    }

    /// The total number of sales across all bands.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Serialize for PriceBandCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PRICE_BANDS.len()))?;
        for (band, count) in self.iter() {
            map.serialize_entry(band.label, &count)?;
        }
        map.end()
    }
}

/// Return the price histogram for the month in the `month` query parameter.
pub async fn get_bar_chart_endpoint(
    State(state): State<StatisticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<PriceBandCounts>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let counts = get_price_band_counts(&query.filter(), &connection)
        .inspect_err(|error| tracing::error!("could not get price bands: {error}"))?;

    Ok(Json(counts))
}

/// Count the sales selected by `filter` in each price band.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query fails.
pub(crate) fn get_price_band_counts(
    filter: &SaleFilter,
    connection: &Connection,
) -> Result<PriceBandCounts, Error> {
    let (where_clause, params) = filter.where_clause();
    let band_cases = PRICE_BANDS
        .iter()
        .enumerate()
        .map(|(index, band)| format!("WHEN {} THEN {index}", band.sql_condition()))
        .collect::<Vec<_>>()
        .join(" ");

    let query = format!(
        "SELECT CASE {band_cases} END AS band, COUNT(id) \
        FROM sale {where_clause} \
        GROUP BY band"
    );

    let mut counts = PriceBandCounts::default();

    let mut statement = connection.prepare(&query)?;
    let rows = statement.query_map(params_from_iter(params), |row| {
        Ok((row.get::<_, usize>(0)?, row.get::<_, u64>(1)?))
    })?;

    for row in rows {
        let (band, count) = row?;
        if let Some(slot) = counts.counts.get_mut(band) {
            *slot = count;
        }
    }

    Ok(counts)
}
