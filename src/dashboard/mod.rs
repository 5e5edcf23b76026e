//! Dashboard module
//!
//! Provides an HTML page for browsing the sales of a month alongside their
//! statistics and charts.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
