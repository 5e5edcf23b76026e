//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    sale::get_transactions_endpoint,
    seed::initialize_endpoint,
    statistics::{
        get_bar_chart_endpoint, get_combined_data_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes: Router<AppState> = Router::new()
        .route(endpoints::INITIALIZE, post(initialize_endpoint))
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED_DATA, get(get_combined_data_endpoint));

    Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .merge(api_routes.clone())
        .nest(endpoints::API_PREFIX, api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
