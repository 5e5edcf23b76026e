//! All the statistics for a month in one response.

use axum::{
    Json,
    extract::{Query, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    sale::{MonthQuery, SaleFilter},
};

use super::{
    CategoryCounts, PriceBandCounts, Statistics, StatisticsState, get_category_counts,
    get_price_band_counts, get_statistics,
};

/// The summary totals, price histogram and category counts for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedData {
    /// See [Statistics].
    pub statistics: Statistics,
    /// See [PriceBandCounts].
    pub bar_chart: PriceBandCounts,
    /// See [CategoryCounts].
    pub pie_chart: CategoryCounts,
}

/// Return every statistic for the month in the `month` query parameter.
pub async fn get_combined_data_endpoint(
    State(state): State<StatisticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedData>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let combined = get_combined_data(&query.filter(), &connection)
        .inspect_err(|error| tracing::error!("could not get combined data: {error}"))?;

    Ok(Json(combined))
}

/// Compute every statistic for the sales selected by `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if any of the SQL queries fail.
pub(crate) fn get_combined_data(
    filter: &SaleFilter,
    connection: &Connection,
) -> Result<CombinedData, Error> {
    Ok(CombinedData {
        statistics: get_statistics(filter, connection)?,
        bar_chart: get_price_band_counts(filter, connection)?,
        pie_chart: get_category_counts(filter, connection)?,
    })
}
