//! Sale records and the listing of them.
//!
//! This module contains:
//! - The `Sale` model and `SaleBuilder` for creating sales
//! - Database functions for storing and counting sales
//! - The filter that scopes every query to a month and optional search text
//! - The paginated listing endpoint

mod core;
mod listing;
mod query;

pub use core::{Sale, SaleBuilder, count_sales, create_sale_table, create_sales};
pub use listing::get_transactions_endpoint;

pub(crate) use listing::get_listing_page;
pub(crate) use query::{ListingQuery, MonthQuery, QuerySelection, SaleFilter};

#[cfg(test)]
pub(crate) use core::create_sale;
#[cfg(test)]
pub(crate) use listing::count_matching_sales;
