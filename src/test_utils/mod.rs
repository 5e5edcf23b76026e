#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod html;

pub(crate) use db::{get_test_connection, get_test_state, march_selection};
pub(crate) use html::{assert_valid_html, parse_html_document};
