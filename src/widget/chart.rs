//! The line chart of the running balance.
//!
//! The chart options are built with `charming` and serialized to JSON for the
//! ECharts library. The initialization script is rendered next to the chart
//! container so that it runs again whenever HTMX swaps the widget.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};
use time::{
    OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    macros::format_description,
};

const BALANCE_CHART_ID: &str = "balance-chart";

const DATE_LABEL_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

/// Split the cumulative balance into date labels in `local_offset` and values.
fn balance_series(
    series: &[(OffsetDateTime, i64)],
    local_offset: UtcOffset,
) -> (Vec<String>, Vec<i64>) {
    series
        .iter()
        .map(|(timestamp, balance)| {
            let local = timestamp.to_offset(local_offset);
            let label = local
                .format(DATE_LABEL_FORMAT)
                .unwrap_or_else(|_| local.date().to_string());

            (label, *balance)
        })
        .unzip()
}

/// Create the chart for the cumulative balance `series`, oldest first.
pub(super) fn balance_chart(series: &[(OffsetDateTime, i64)], local_offset: UtcOffset) -> Chart {
    let (labels, values) = balance_series(series, local_offset);
    let values: Vec<f64> = values.into_iter().map(|value| value as f64).collect();

    Chart::new()
        .title(Title::new().text("Balance"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Total Over Time").data(values))
}

/// Render the chart container and the script that draws `chart` in it.
pub(super) fn balance_chart_view(chart: &Chart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{BALANCE_CHART_ID}");
            const chart = echarts.getInstanceByDom(chartDom) || echarts.init(chartDom);
            chart.setOption({});

            window.addEventListener('resize', () => chart.resize());

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }})();"#,
        chart
    );

    html!(
        section class="w-full"
        {
            div
                id=(BALANCE_CHART_ID)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}

            script { (PreEscaped(script)) }
        }
    )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD',
              maximumFractionDigits: 0
            });
            return currencyFormatter.format(number);",
    )
}
