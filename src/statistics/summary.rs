//! Totals for the sales of a month.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    sale::{MonthQuery, SaleFilter},
};

use super::StatisticsState;

/// Summary totals for the sales of a month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of every sale in the month.
    pub total_sale_amount: f64,
    /// The number of sales with a price greater than zero.
    pub total_sold_items: u64,
    /// The number of sales with a price of zero, which are taken to mean the
    /// product did not sell.
    pub total_not_sold_items: u64,
}

/// Return the summary totals for the month in the `month` query parameter.
pub async fn get_statistics_endpoint(
    State(state): State<StatisticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let statistics = get_statistics(&query.filter(), &connection)
        .inspect_err(|error| tracing::error!("could not get statistics: {error}"))?;

    Ok(Json(statistics))
}

/// Compute the summary totals for the sales selected by `filter`.
///
/// Any search text in `filter` is ignored, the totals always cover the whole month.
/// The totals are zero when no sales match.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query fails.
pub(crate) fn get_statistics(
    filter: &SaleFilter,
    connection: &Connection,
) -> Result<Statistics, Error> {
    let (where_clause, params) = SaleFilter::for_month(filter.month()).where_clause();

    // Every sale is either sold or not sold, so the two counts add up to the
    // number of sales in the month.
    let query = format!(
        "SELECT \
            COALESCE(SUM(price), 0.0), \
            COALESCE(SUM(CASE WHEN price > 0 THEN 1 ELSE 0 END), 0), \
            COALESCE(SUM(CASE WHEN price > 0 THEN 0 ELSE 1 END), 0) \
        FROM sale {where_clause}"
    );

    connection
        .query_row(&query, params_from_iter(params), |row| {
            Ok(Statistics {
                total_sale_amount: row.get(0)?,
                total_sold_items: row.get(1)?,
                total_not_sold_items: row.get(2)?,
            })
        })
        .map_err(|error| error.into())
}
