//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for financial data:
//! - **Income vs Expenses Chart**: Monthly income and expense totals over the last year
//! - **Monthly Expenses Chart**: Stacked bar chart of expenses grouped by category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, ItemStyle,
        JsFunction, Tooltip, Trigger,
    },
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{dashboard::aggregation::PeriodTotals, html::HeadElement};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
///
/// # Arguments
/// * `charts` - The charts to render containers for
///
/// # Returns
/// Maud markup containing a grid of chart container divs.
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
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
///
/// # Arguments
/// * `charts` - The charts to generate initialization scripts for
///
/// # Returns
/// HeadElement containing the initialization JavaScript.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn income_expenses_chart(labels: &[String], totals: &[PeriodTotals]) -> Chart {
    let income: Vec<f64> = totals.iter().map(|month| month.income).collect();
    let expenses: Vec<f64> = totals.iter().map(|month| month.expenses).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Income vs Expenses")
                .subtext("Last twelve months"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels.to_vec()))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color("green"))
                .data(income),
        )
        .series(
            bar::Bar::new()
                .name("Expenses")
                .item_style(ItemStyle::new().color("red"))
                .data(expenses),
        )
}

pub(super) fn expenses_chart(
    labels: &[String],
    series_data: Vec<(String, Vec<Option<f64>>)>,
) -> Chart {
    let mut chart = Chart::new()
        .title(
            Title::new()
                .text("Monthly Expenses")
                .subtext("Last twelve months, grouped by category")
                .left(20)
                .top("1%"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels.to_vec()))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        );

    for (category, data) in series_data {
        chart = chart.series(
            bar::Bar::new()
                .name(category)
                .stack("Expenses")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use crate::{dashboard::aggregation::PeriodTotals, html::HeadElement};

    use super::{DashboardChart, charts_script, expenses_chart, income_expenses_chart};

    #[test]
    fn income_expenses_chart_has_both_series() {
        let labels = vec!["Jan 2025".to_owned(), "Feb 2025".to_owned()];
        let totals = vec![
            PeriodTotals {
                income: 100.0,
                expenses: 40.0,
            },
            PeriodTotals::default(),
        ];

        let options = income_expenses_chart(&labels, &totals).to_string();

        assert!(options.contains("\"Income\""), "{options}");
        assert!(options.contains("\"Expenses\""), "{options}");
        assert!(options.contains("Feb 2025"), "{options}");
    }

    #[test]
    fn expenses_chart_stacks_categories() {
        let labels = vec!["Jan 2025".to_owned()];
        let series = vec![
            ("Food".to_owned(), vec![Some(10.0)]),
            ("Other".to_owned(), vec![None]),
        ];

        let options = expenses_chart(&labels, series).to_string();

        assert!(options.contains("\"Food\""), "{options}");
        assert!(options.contains("\"stack\""), "{options}");
    }

    #[test]
    fn script_initializes_each_chart() {
        let charts = [DashboardChart {
            id: "expenses-chart",
            options: "{}".to_owned(),
        }];

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want a script source");
        };

        assert!(script.0.contains("document.getElementById(\"expenses-chart\")"));
    }
}
