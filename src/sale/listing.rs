//! Lists the sales of a month one page at a time.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::{Connection, params_from_iter, types::Value};
use serde::Serialize;

use crate::{AppState, Error, pagination::PaginationConfig};

use super::{
    core::{Sale, map_sale_row},
    query::{ListingQuery, QuerySelection, SaleFilter},
};

/// One page of the sales matching a filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage {
    /// The sales on the requested page, ordered by ID.
    pub records: Vec<Sale>,
    /// The number of sales matching the filter across all pages.
    pub total: u64,
}

/// The state needed for listing sales.
#[derive(Debug, Clone)]
pub struct ListingState {
    /// The database connection for reading sales.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls the default and maximum page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Return a page of the sales in a month, with optional search text.
///
/// Query parameters: `month`, `search`, `page` and `perPage`. Malformed
/// values are coerced rather than rejected, see [QuerySelection::from_query].
pub async fn get_transactions_endpoint(
    State(state): State<ListingState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingPage>, Error> {
    let selection = QuerySelection::from_query(&query, &state.pagination_config);

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let page = get_listing_page(&selection, &connection)
        .inspect_err(|error| tracing::error!("could not get sales page: {error}"))?;

    Ok(Json(page))
}

/// Get one page of the sales selected by `selection` and the total number of matches.
///
/// Sales are ordered by ID so pages are stable between requests.
///
/// # Errors
/// Returns [Error::SqlError] if the SQL query fails or a row cannot be mapped.
pub(crate) fn get_listing_page(
    selection: &QuerySelection,
    connection: &Connection,
) -> Result<ListingPage, Error> {
    let records = get_sales_page(selection, connection)?;
    let total = count_matching_sales(&selection.filter, connection)?;

    Ok(ListingPage { records, total })
}

fn get_sales_page(
    selection: &QuerySelection,
    connection: &Connection,
) -> Result<Vec<Sale>, Error> {
    let (where_clause, mut params) = selection.filter.where_clause();
    let limit_index = params.len() + 1;
    let offset_index = params.len() + 2;

    let query = format!(
        "SELECT id, title, description, price, category, date_of_sale FROM sale \
        {where_clause} \
        ORDER BY id ASC \
        LIMIT ?{limit_index} OFFSET ?{offset_index}"
    );

    params.push(to_sql_integer(selection.page_size));
    params.push(to_sql_integer(selection.offset()));

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_sale_row)?
        .map(|sale_result| sale_result.map_err(Error::SqlError))
        .collect()
}

/// Count the sales matching `filter`, ignoring pagination.
pub(crate) fn count_matching_sales(
    filter: &SaleFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let (where_clause, params) = filter.where_clause();
    let query = format!("SELECT COUNT(id) FROM sale {where_clause}");

    connection
        .query_row(&query, params_from_iter(params), |row| row.get(0))
        .map_err(|error| error.into())
}

/// SQLite integers are signed, clamp values that do not fit.
fn to_sql_integer(number: u64) -> Value {
    Value::Integer(i64::try_from(number).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        pagination::PaginationConfig,
        sale::{
            Sale, create_sale,
            query::{ListingQuery, QuerySelection, SaleFilter},
        },
        test_utils::get_test_connection,
    };

    use super::{count_matching_sales, get_listing_page};

    fn selection(month: &str, search: &str, page: u64, page_size: u64) -> QuerySelection {
        let query = ListingQuery {
            month: Some(month.to_owned()),
            search: Some(search.to_owned()),
            page: Some(page.to_string()),
            per_page: Some(page_size.to_string()),
        };

        QuerySelection::from_query(&query, &PaginationConfig::default())
    }

    fn insert_march_and_april_sales(conn: &Connection) {
        for i in 1..=25 {
            create_sale(
                Sale::build(&format!("March item #{i}"), i as f64 * 10.0, datetime!(2022-03-15 10:00 UTC))
                    .description("spring stock")
                    .category("electronics"),
                conn,
            )
            .expect("Could not create sale");
        }

        for i in 1..=3 {
            create_sale(
                Sale::build(&format!("April item #{i}"), 5.0, datetime!(2021-04-02 10:00 UTC))
                    .category("jewelery"),
                conn,
            )
            .expect("Could not create sale");
        }
    }

    #[test]
    fn returns_first_page_and_total() {
        let conn = get_test_connection();
        insert_march_and_april_sales(&conn);

        let page = get_listing_page(&selection("03", "", 1, 10), &conn).unwrap();

        assert_eq!(page.total, 25);
        assert_eq!(page.records.len(), 10);
        assert!(page.records.iter().all(|sale| sale.title.starts_with("March")));
    }

    #[test]
    fn pages_are_ordered_by_id_without_overlap() {
        let conn = get_test_connection();
        insert_march_and_april_sales(&conn);

        let mut ids = Vec::new();
        for page_number in 1..=3 {
            let page = get_listing_page(&selection("3", "", page_number, 10), &conn).unwrap();
            assert_eq!(page.total, 25);
            ids.extend(page.records.iter().map(|sale| sale.id));
        }

        assert_eq!(ids, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_total() {
        let conn = get_test_connection();
        insert_march_and_april_sales(&conn);

        let page = get_listing_page(&selection("3", "", 10, 10), &conn).unwrap();

        assert!(page.records.is_empty());
        assert_eq!(page.total, 25);
    }

    #[test]
    fn month_ignores_year() {
        let conn = get_test_connection();
        create_sale(Sale::build("old", 1.0, datetime!(2019-04-02 10:00 UTC)), &conn).unwrap();
        create_sale(Sale::build("new", 1.0, datetime!(2023-04-30 23:59 UTC)), &conn).unwrap();
        create_sale(Sale::build("may", 1.0, datetime!(2023-05-01 00:00 UTC)), &conn).unwrap();

        let page = get_listing_page(&selection("4", "", 1, 10), &conn).unwrap();

        assert_eq!(page.total, 2);
        let titles: Vec<_> = page.records.iter().map(|sale| sale.title.as_str()).collect();
        assert_eq!(titles, ["old", "new"]);
    }

    #[test]
    fn search_matches_title_description_or_price_ignoring_case() {
        let conn = get_test_connection();
        create_sale(
            Sale::build("Mens Cotton Jacket", 55.99, datetime!(2022-03-01 10:00 UTC))
                .description("great outerwear"),
            &conn,
        )
        .unwrap();
        create_sale(
            Sale::build("Ring", 9.99, datetime!(2022-03-02 10:00 UTC))
                .description("Silver ring with a JACKET-shaped charm"),
            &conn,
        )
        .unwrap();
        create_sale(
            Sale::build("Monitor", 599.0, datetime!(2022-03-03 10:00 UTC)),
            &conn,
        )
        .unwrap();
        create_sale(
            Sale::build("Jacket from another month", 55.99, datetime!(2022-08-03 10:00 UTC)),
            &conn,
        )
        .unwrap();

        let by_text = get_listing_page(&selection("3", "jacket", 1, 10), &conn).unwrap();
        assert_eq!(by_text.total, 2);

        let by_price = get_listing_page(&selection("3", "599", 1, 10), &conn).unwrap();
        assert_eq!(by_price.total, 1);
        assert_eq!(by_price.records[0].title, "Monitor");
    }

    #[test]
    fn search_wildcards_match_literally() {
        let conn = get_test_connection();
        create_sale(Sale::build("100% cotton", 1.0, datetime!(2022-03-01 10:00 UTC)), &conn).unwrap();
        create_sale(Sale::build("cotton", 1.0, datetime!(2022-03-01 10:00 UTC)), &conn).unwrap();

        let page = get_listing_page(&selection("3", "%", 1, 10), &conn).unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].title, "100% cotton");
    }

    #[test]
    fn invalid_month_matches_nothing() {
        let conn = get_test_connection();
        insert_march_and_april_sales(&conn);

        for month in ["0", "13", "-3", "march"] {
            let page = get_listing_page(&selection(month, "", 1, 10), &conn).unwrap();
            assert_eq!(page.total, 0, "month {month:?} matched sales");
            assert!(page.records.is_empty());
        }
    }

    #[test]
    fn count_ignores_pagination() {
        let conn = get_test_connection();
        insert_march_and_april_sales(&conn);

        let count = count_matching_sales(&SaleFilter::for_month(Some(4)), &conn).unwrap();

        assert_eq!(count, 3);
    }
}
