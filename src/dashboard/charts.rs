//! ECharts visualizations of the statistics for a month.
//!
//! - **Price bands**: a bar chart of how many sales fall in each price band
//! - **Categories**: a pie chart of how many sales are in each category
//!
//! Each chart is generated as JSON options for the ECharts library and
//! rendered with a container div and a script that initializes it.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    datatype::DataPointItem,
    element::{AxisType, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    html::HeadElement,
    statistics::{CategoryCounts, PriceBandCounts},
};

/// The URL of the ECharts library the chart scripts depend on.
pub(super) const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders a grid of empty containers that the chart scripts draw into.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the JavaScript that initializes each chart once the page has loaded.
///
/// Charts are resized along with the window. Every `<` in the options is
/// written as a unicode escape so text from the data, such as a category
/// name, cannot close the script element.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    )))
}

/// Escape `<` in JSON so it can be embedded in a `<script>` element.
///
/// `<` only appears inside JSON strings, where `\u003c` decodes to the same text.
fn escape_script_text(json: &str) -> String {
    json.replace('<', "\\u003c")
}

pub(super) fn price_band_chart(month_name: &str, counts: &PriceBandCounts) -> Chart {
    let (labels, values): (Vec<&str>, Vec<f64>) = counts
        .iter()
        .map(|(band, count)| (band.label, count as f64))
        .unzip();

    Chart::new()
        .title(
            Title::new()
                .text("Sales by Price")
                .subtext(format!("Number of items per price range in {month_name}")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Items").data(values))
}

pub(super) fn category_chart(month_name: &str, counts: &CategoryCounts) -> Chart {
    let data = counts
        .iter()
        .map(|(category, count)| DataPointItem::new(count as f64).name(category))
        .collect::<Vec<_>>();

    Chart::new()
        .title(
            Title::new()
                .text("Sales by Category")
                .subtext(format!("Number of items per category in {month_name}")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Items")
                .radius(vec!["35%", "65%"])
                .data(data),
        )
}
