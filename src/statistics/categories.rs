//! The number of sales per category in a month.

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

/// The number of sales in each category, ordered by category name.
///
/// Serializes as a JSON object mapping category to count. Only categories
/// with at least one sale are included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts(Vec<(String, u64)>);

impl CategoryCounts {
    /// Iterate over the categories and their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0
            .iter()
            .map(|(category, count)| (category.as_str(), *count))
    }

    /// The total number of sales across all categories.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|(_, count)| count).sum()
    }

    /// Whether there are no categories.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, count) in &self.0 {
            map.serialize_entry(category, count)?;
        }
        map.end()
    }
}

/// Return the number of sales per category for the month in the `month` query parameter.
pub async fn get_pie_chart_endpoint(
    State(state): State<StatisticsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CategoryCounts>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let counts = get_category_counts(&query.filter(), &connection)
        .inspect_err(|error| tracing::error!("could not get category counts: {error}"))?;

    Ok(Json(counts))
}

/// Count the sales selected by `filter` in each category.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query fails.
pub(crate) fn get_category_counts(
    filter: &SaleFilter,
    connection: &Connection,
) -> Result<CategoryCounts, Error> {
    let (where_clause, params) = filter.where_clause();
    let query = format!(
        "SELECT category, COUNT(id) FROM sale {where_clause} \
        GROUP BY category \
        ORDER BY category ASC"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<(String, u64)>, rusqlite::Error>>()
        .map(CategoryCounts)
        .map_err(|error| error.into())
}
