//! The API endpoints URIs.
//!
//! The JSON endpoints are served both at the paths below and nested under
//! [API_PREFIX].

/// The dashboard page.
pub const ROOT: &str = "/";
/// The prefix the JSON endpoints are also nested under.
pub const API_PREFIX: &str = "/api";
/// The route for seeding the database from the external feed.
pub const INITIALIZE: &str = "/initialize";
/// The route for listing the sales of a month.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the summary totals of a month.
pub const STATISTICS: &str = "/statistics";
/// The route for the price histogram of a month.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the category counts of a month.
pub const PIE_CHART: &str = "/pie-chart";
/// The route for all the statistics of a month in one response.
pub const COMBINED_DATA: &str = "/combined-data";

// These tests are here so that we know the routes will not make the router panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::API_PREFIX);
        assert_endpoint_is_valid_uri(endpoints::INITIALIZE);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::STATISTICS);
        assert_endpoint_is_valid_uri(endpoints::BAR_CHART);
        assert_endpoint_is_valid_uri(endpoints::PIE_CHART);
        assert_endpoint_is_valid_uri(endpoints::COMBINED_DATA);
    }

    #[test]
    fn nested_endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::INITIALIZE,
            endpoints::TRANSACTIONS,
            endpoints::STATISTICS,
            endpoints::BAR_CHART,
            endpoints::PIE_CHART,
            endpoints::COMBINED_DATA,
        ] {
            assert_endpoint_is_valid_uri(&format!("{}{endpoint}", endpoints::API_PREFIX));
        }
    }
}
