//! Card components for the current month's totals and expenses by category.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::PeriodTotals,
    endpoints,
    html::{LINK_STYLE, format_currency},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";
const CARD_LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    }
}

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

fn summary_card(id: &str, label: &str, amount: f64, color_class: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            div class=(CARD_LABEL_STYLE) { (label) }
            div id=(id) class={ (CARD_VALUE_STYLE) " " (color_class) } { (format_currency(amount)) }
        }
    }
}

/// Renders the income, expenses, net and total balance cards for the current month.
pub(super) fn summary_cards_view(
    month_label: &str,
    totals: PeriodTotals,
    total_balance: f64,
) -> Markup {
    let net = totals.net();

    html! {
        section class="w-full mx-auto mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "This Month" }
                span class=(CARD_LABEL_STYLE) { (month_label) }
            }

            div class="grid grid-cols-2 lg:grid-cols-4 gap-4"
            {
                (summary_card("summary-income", "Income", totals.income, "text-green-600 dark:text-green-400"))
                (summary_card("summary-expenses", "Expenses", totals.expenses, "text-red-600 dark:text-red-400"))
                (summary_card("summary-net", "Net", net, amount_color_class(net)))
                (summary_card("summary-balance", "Total Balance", total_balance, amount_color_class(total_balance)))
            }
        }
    }
}

/// Renders this month's expenses per category with their share of the total.
///
/// Shows a prompt to add categories when there are no expenses to break down.
pub(super) fn expense_cards_view(breakdown: &[(String, f64)]) -> Markup {
    let total: f64 = breakdown.iter().map(|(_, amount)| amount).sum();

    html! {
        section class="w-full mx-auto mb-8"
        {
            h3 class="text-xl font-semibold mb-4" { "Expenses by Category" }

            @if breakdown.is_empty() {
                p class=(CARD_LABEL_STYLE)
                {
                    "No expenses this month. Assign "
                    a href=(endpoints::CATEGORIES_VIEW) class=(LINK_STYLE) { "categories" }
                    " to your transactions to see where your money goes."
                }
            } @else {
                div class="grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-4"
                {
                    @for (category, amount) in breakdown {
                        @let percentage = if total > 0.0 { amount / total * 100.0 } else { 0.0 };

                        div class=(CARD_STYLE) data-category-card=(category)
                        {
                            h4 class="text-lg font-semibold mb-3 truncate" title=(category) { (category) }
                            div class="text-3xl font-bold mb-1 category-amount" { (format_currency(*amount)) }
                            div class={ (CARD_LABEL_STYLE) " mb-2" }
                            {
                                (format_percentage(percentage)) "% of expenses"
                            }
                            (progress_bar(percentage))
                        }
                    }
                }
            }
        }
    }
}

/// Renders a horizontal progress bar showing percentage of total expenses.
fn progress_bar(percentage: f64) -> Markup {
    let clamped = percentage.clamp(0.0, 100.0);

    // Minimum 3% width so the rounded corners are visible.
    let display_percentage = if clamped > 0.0 && clamped < 3.0 {
        3.0
    } else {
        clamped
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5 mb-2"
            role="progressbar"
            aria-valuenow=(format_percentage(clamped))
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if clamped > 0.0 {
                div
                    class="bg-blue-600 dark:bg-blue-500 h-2.5 rounded-full transition-all"
                    style=(format!("width: {:.1}%", display_percentage))
                {}
            }
        }
    }
}
