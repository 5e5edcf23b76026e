//! Statistics computed over the sales of a month.
//!
//! Each view is a pure function of the stored sales and the requested month:
//! - Summary totals: sale amount, sold and unsold item counts
//! - Price bands: a histogram of prices with fixed boundaries
//! - Categories: the number of sales per category
//! - Combined: all three of the above in one response

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;

use crate::AppState;

mod categories;
mod combined;
mod price_bands;
mod summary;

pub use categories::{CategoryCounts, get_pie_chart_endpoint};
pub use combined::{CombinedData, get_combined_data_endpoint};
pub use price_bands::{PriceBandCounts, get_bar_chart_endpoint};
pub use summary::{Statistics, get_statistics_endpoint};

pub(crate) use categories::get_category_counts;
pub(crate) use combined::get_combined_data;
pub(crate) use price_bands::get_price_band_counts;
pub(crate) use summary::get_statistics;

#[cfg(test)]
pub(crate) use price_bands::PRICE_BANDS;

/// The state needed for computing statistics.
#[derive(Debug, Clone)]
pub struct StatisticsState {
    /// The database connection for reading sales.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatisticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}
