use rusqlite::Connection;

use crate::{
    AppState, DEFAULT_SEED_URL,
    db::initialize,
    pagination::PaginationConfig,
    sale::{ListingQuery, QuerySelection},
};

pub(crate) fn get_test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}

pub(crate) fn get_test_state() -> AppState {
    let conn = Connection::open_in_memory().expect("Could not open database in memory.");
    AppState::new(conn, DEFAULT_SEED_URL, PaginationConfig::default())
        .expect("Could not create app state.")
}

/// The first page of March with no search text.
pub(crate) fn march_selection() -> QuerySelection {
    let query = ListingQuery {
        month: Some("03".to_owned()),
        ..Default::default()
    };

    QuerySelection::from_query(&query, &PaginationConfig::default())
}
