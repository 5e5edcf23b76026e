//! Dashboard HTTP handler and view rendering.
//!
//! The page is rendered from the same listing and statistics queries as the
//! JSON API, so both always agree.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, Query, State};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Serialize;
use time::Month;

use crate::{
    AppState, Error,
    dashboard::{
        charts::{
            DashboardChart, ECHARTS_URL, category_chart, charts_script, charts_view,
            price_band_chart,
        },
        tables::{pagination_links, sales_table, statistics_table},
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base,
    },
    pagination::{PaginationConfig, page_count},
    sale::{ListingQuery, QuerySelection, SaleFilter, get_listing_page},
    statistics::{CombinedData, get_combined_data},
};

/// The month shown when the page is requested without one.
const DEFAULT_MONTH: Month = Month::March;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading sales.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls the default and maximum page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query string for a link to another page of the listing.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageLinkQuery<'a> {
    month: Option<&'a str>,
    search: Option<&'a str>,
    page: u64,
    per_page: u64,
}

/// Display the sales of a month with their statistics and charts.
///
/// Takes the same query parameters as the transactions endpoint. If no month
/// is given, March is shown. The search text narrows the table but not the
/// statistics or charts, which always cover the whole month.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(mut query): Query<ListingQuery>,
) -> Result<Markup, Error> {
    if query.month.is_none() {
        query.month = Some((DEFAULT_MONTH as u8).to_string());
    }

    let selection = QuerySelection::from_query(&query, &state.pagination_config);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let listing = get_listing_page(&selection, &connection)
        .inspect_err(|error| tracing::error!("could not get sales page: {error}"))?;
    let combined = get_combined_data(&SaleFilter::for_month(selection.filter.month()), &connection)
        .inspect_err(|error| tracing::error!("could not get dashboard statistics: {error}"))?;

    drop(connection);

    let page_count = page_count(listing.total, selection.page_size);
    let previous_url = (selection.page > 1)
        .then(|| page_url(&query, &selection, selection.page - 1))
        .flatten();
    let next_url = (selection.page < page_count)
        .then(|| page_url(&query, &selection, selection.page + 1))
        .flatten();

    let month_name = month_name(selection.filter.month());
    let charts = dashboard_charts(&month_name, &combined);

    let content = html!(
        div
            id="dashboard-content"
            class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mb-6" { "Transactions Dashboard" }

            (filter_form(&selection, query.per_page.as_deref()))
            (sales_table(&listing.records))
            (pagination_links(
                selection.page,
                page_count,
                previous_url.as_deref(),
                next_url.as_deref(),
            ))
            (statistics_table(&month_name, &combined.statistics))
            (charts_view(&charts))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    Ok(base("Dashboard", &scripts, &content))
}

/// The name of `month`, or a placeholder if the month is invalid.
fn month_name(month: Option<u8>) -> String {
    month
        .and_then(|month| Month::try_from(month).ok())
        .map_or_else(|| "Unknown month".to_owned(), |month| month.to_string())
}

/// Build the link to `page`, keeping the month, search text and page size of `query`.
fn page_url(query: &ListingQuery, selection: &QuerySelection, page: u64) -> Option<String> {
    let link_query = PageLinkQuery {
        month: query.month.as_deref(),
        search: selection.filter.search(),
        page,
        per_page: selection.page_size,
    };

    serde_urlencoded::to_string(&link_query)
        .inspect_err(|error| tracing::error!("could not build page link: {error}"))
        .ok()
        .map(|query_string| format!("{}?{query_string}", endpoints::ROOT))
}

fn dashboard_charts(month_name: &str, combined: &CombinedData) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "price-band-chart",
            options: price_band_chart(month_name, &combined.bar_chart).to_string(),
        },
        DashboardChart {
            id: "category-chart",
            options: category_chart(month_name, &combined.pie_chart).to_string(),
        },
    ]
}

fn filter_form(selection: &QuerySelection, per_page: Option<&str>) -> Markup {
    let selected_month = selection.filter.month();

    html!(
        form
            method="get"
            action=(endpoints::ROOT)
            class="flex flex-col sm:flex-row gap-4 items-end w-full mb-6"
        {
            div class="w-full"
            {
                label for="search" class=(FORM_LABEL_STYLE) { "Search transaction" }

                input
                    type="search"
                    name="search"
                    id="search"
                    placeholder="Title, description or price"
                    value=(selection.filter.search().unwrap_or_default())
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="w-full sm:w-64"
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select
                    name="month"
                    id="month"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for month in 1..=12u8 {
                        option
                            value=(month)
                            selected[selected_month == Some(month)]
                        {
                            (month_name(Some(month)))
                        }
                    }
                }
            }

            @if let Some(per_page) = per_page {
                input type="hidden" name="perPage" value=(per_page);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    )
}
