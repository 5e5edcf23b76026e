//! Table views for the sales of a month and their summary totals.

use maud::{Markup, html};

use crate::{
    html::{
        LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
    sale::Sale,
    statistics::Statistics,
};

const TABLE_STYLE: &str = "w-full text-sm text-left text-gray-500 dark:text-gray-400";

/// Renders the summary totals for a month.
pub(super) fn statistics_table(month_name: &str, statistics: &Statistics) -> Markup {
    html! {
        div id="statistics" class="w-full mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Statistics - " (month_name) }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class=(TABLE_STYLE)
                {
                    tbody
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total sale" }
                            td class=(TABLE_CELL_STYLE) data-statistic="total-sale-amount"
                            {
                                (format_currency(statistics.total_sale_amount))
                            }
                        }
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total sold items" }
                            td class=(TABLE_CELL_STYLE) data-statistic="total-sold-items"
                            {
                                (statistics.total_sold_items)
                            }
                        }
                        tr class=(TABLE_ROW_STYLE)
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total not sold items" }
                            td class=(TABLE_CELL_STYLE) data-statistic="total-not-sold-items"
                            {
                                (statistics.total_not_sold_items)
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders one page of sales, or a message if there are none.
pub(super) fn sales_table(sales: &[Sale]) -> Markup {
    html! {
        div class="w-full overflow-x-auto rounded-lg shadow mb-4"
        {
            table id="sales" class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date of sale" }
                    }
                }

                tbody
                {
                    @for sale in sales {
                        tr class=(TABLE_ROW_STYLE) data-sale-id=(sale.id)
                        {
                            td class=(TABLE_CELL_STYLE) { (sale.id) }
                            td class=(TABLE_CELL_STYLE) { (sale.title) }
                            td class=(TABLE_CELL_STYLE) { (sale.description) }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} { (format_currency(sale.price)) }
                            td class=(TABLE_CELL_STYLE) { (sale.category) }
                            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} { (sale.date_of_sale.date()) }
                        }
                    }

                    @if sales.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="6" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions found."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the current page number with links to the neighbouring pages.
///
/// A link is only shown if its URL is given.
pub(super) fn pagination_links(
    page: u64,
    page_count: u64,
    previous_url: Option<&str>,
    next_url: Option<&str>,
) -> Markup {
    html! {
        nav
            aria-label="Pagination"
            class="flex w-full justify-between items-center mb-8"
        {
            @if let Some(url) = previous_url {
                a id="previous-page" href=(url) class=(LINK_STYLE) { "Previous" }
            } @else {
                span {}
            }

            span id="page-number" { "Page " (page) " of " (page_count) }

            @if let Some(url) = next_url {
                a id="next-page" href=(url) class=(LINK_STYLE) { "Next" }
            } @else {
                span {}
            }
        }
    }
}
