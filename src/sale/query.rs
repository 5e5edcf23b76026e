//! Builds the SQL predicates used to select the sales of a month.

use rusqlite::types::Value;
use serde::Deserialize;

use crate::pagination::PaginationConfig;

/// The SQL expression for the calendar month (1-12) of a sale, ignoring the year.
pub(crate) const SALE_MONTH: &str = "CAST(strftime('%m', date_of_sale) AS INTEGER)";

/// The escape character used in `LIKE` patterns built from search text.
const LIKE_ESCAPE: char = '\\';

/// Parse a month number from a query parameter.
///
/// Returns `None` if the text is missing, not an integer, or not in the range 1-12.
/// Leading zeros are allowed, so "03" is March.
pub(crate) fn parse_month(text: Option<&str>) -> Option<u8> {
    text?
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|month| (1..=12).contains(month))
}

/// The raw query parameters for endpoints that are scoped to a month.
///
/// Fields are kept as strings so malformed values are coerced instead of
/// rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MonthQuery {
    pub month: Option<String>,
}

impl MonthQuery {
    pub(crate) fn filter(&self) -> SaleFilter {
        SaleFilter::for_month(parse_month(self.month.as_deref()))
    }
}

/// The raw query parameters for listing sales.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingQuery {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

/// Selects the sales in a month, optionally narrowed down by search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SaleFilter {
    month: Option<u8>,
    search: Option<String>,
}

impl SaleFilter {
    /// Select every sale in `month`.
    ///
    /// A `month` of `None` selects nothing.
    pub(crate) fn for_month(month: Option<u8>) -> Self {
        Self {
            month,
            search: None,
        }
    }

    /// Only select sales whose title, description or price contains `search`,
    /// ignoring case.
    ///
    /// Blank search text does not narrow the selection.
    pub(crate) fn with_search(mut self, search: &str) -> Self {
        let search = search.trim();
        self.search = (!search.is_empty()).then(|| search.to_owned());
        self
    }

    pub(crate) fn month(&self) -> Option<u8> {
        self.month
    }

    pub(crate) fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Build the `WHERE` clause for this filter along with its positional parameters.
    ///
    /// The clause includes the `WHERE` keyword and uses the placeholders
    /// `?1`, `?2`, ..., so callers can append further parameters after
    /// `params.len()`.
    pub(crate) fn where_clause(&self) -> (String, Vec<Value>) {
        // NULL never compares equal, so an invalid month matches no rows.
        let month = self
            .month
            .map_or(Value::Null, |month| Value::Integer(month.into()));

        match &self.search {
            None => (format!("WHERE {SALE_MONTH} = ?1"), vec![month]),
            Some(search) => (
                format!(
                    "WHERE {SALE_MONTH} = ?1 AND (\
                        title LIKE ?2 ESCAPE '{LIKE_ESCAPE}' \
                        OR description LIKE ?2 ESCAPE '{LIKE_ESCAPE}' \
                        OR CAST(price AS TEXT) LIKE ?2 ESCAPE '{LIKE_ESCAPE}')"
                ),
                vec![month, Value::Text(contains_pattern(search))],
            ),
        }
    }
}

/// Build a `LIKE` pattern that matches any text containing `search` literally.
fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');

    for c in search.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }

    pattern.push('%');
    pattern
}

/// A validated request for one page of the sales matching a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QuerySelection {
    pub filter: SaleFilter,
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of sales on a page.
    pub page_size: u64,
}

impl QuerySelection {
    /// Coerce the raw listing parameters into a selection.
    ///
    /// A page that is missing, not a number, or less than one becomes the
    /// default page. The page size falls back to the default in the same way
    /// and is capped at the configured maximum.
    pub(crate) fn from_query(query: &ListingQuery, config: &PaginationConfig) -> Self {
        let filter = SaleFilter::for_month(parse_month(query.month.as_deref()))
            .with_search(query.search.as_deref().unwrap_or_default());

        let page = parse_positive(query.page.as_deref()).unwrap_or(config.default_page);
        let page_size = parse_positive(query.per_page.as_deref())
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);

        Self {
            filter,
            page,
            page_size,
        }
    }

    /// The number of sales to skip to reach the start of the page.
    pub(crate) fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

fn parse_positive(text: Option<&str>) -> Option<u64> {
    text?.trim().parse::<u64>().ok().filter(|number| *number > 0)
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;

    use crate::pagination::PaginationConfig;

    use super::{ListingQuery, QuerySelection, SaleFilter, contains_pattern, parse_month};

    #[test]
    fn parses_months_with_leading_zeros() {
        assert_eq!(parse_month(Some("03")), Some(3));
        assert_eq!(parse_month(Some("3")), Some(3));
        assert_eq!(parse_month(Some(" 12 ")), Some(12));
        assert_eq!(parse_month(Some("1")), Some(1));
    }

    #[test]
    fn rejects_invalid_months() {
        for text in ["0", "13", "-1", "March", "", "3.5", "256"] {
            assert_eq!(parse_month(Some(text)), None, "parsed {text:?} as a month");
        }
        assert_eq!(parse_month(None), None);
    }

    #[test]
    fn month_only_filter_has_one_parameter() {
        let (clause, params) = SaleFilter::for_month(Some(3)).where_clause();

        assert!(!clause.contains("LIKE"), "unexpected search in {clause}");
        assert_eq!(params, vec![Value::Integer(3)]);
    }

    #[test]
    fn blank_search_does_not_narrow_filter() {
        let filter = SaleFilter::for_month(Some(3)).with_search("   ");

        assert_eq!(filter, SaleFilter::for_month(Some(3)));
        assert_eq!(filter.search(), None);
    }

    #[test]
    fn search_filter_binds_pattern() {
        let (clause, params) = SaleFilter::for_month(Some(7))
            .with_search(" phone ")
            .where_clause();

        assert!(clause.contains("title LIKE ?2"));
        assert!(clause.contains("description LIKE ?2"));
        assert!(clause.contains("CAST(price AS TEXT) LIKE ?2"));
        assert_eq!(
            params,
            vec![Value::Integer(7), Value::Text("%phone%".to_owned())]
        );
    }

    #[test]
    fn invalid_month_binds_null() {
        let (_, params) = SaleFilter::for_month(None).where_clause();

        assert_eq!(params, vec![Value::Null]);
    }

    #[test]
    fn pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn selection_uses_defaults_for_missing_values() {
        let config = PaginationConfig::default();

        let selection = QuerySelection::from_query(&ListingQuery::default(), &config);

        assert_eq!(selection.page, 1);
        assert_eq!(selection.page_size, config.default_page_size);
        assert_eq!(selection.filter.month(), None);
        assert_eq!(selection.offset(), 0);
    }

    #[test]
    fn selection_coerces_malformed_values() {
        let config = PaginationConfig::default();
        let query = ListingQuery {
            month: Some("03".to_owned()),
            search: Some("".to_owned()),
            page: Some("zero".to_owned()),
            per_page: Some("-5".to_owned()),
        };

        let selection = QuerySelection::from_query(&query, &config);

        assert_eq!(selection.filter, SaleFilter::for_month(Some(3)));
        assert_eq!(selection.page, 1);
        assert_eq!(selection.page_size, config.default_page_size);
    }

    #[test]
    fn selection_caps_page_size_and_computes_offset() {
        let config = PaginationConfig::default();
        let query = ListingQuery {
            month: Some("11".to_owned()),
            search: None,
            page: Some("3".to_owned()),
            per_page: Some("100000".to_owned()),
        };

        let selection = QuerySelection::from_query(&query, &config);

        assert_eq!(selection.page_size, config.max_page_size);
        assert_eq!(selection.offset(), 2 * config.max_page_size);
    }
}
