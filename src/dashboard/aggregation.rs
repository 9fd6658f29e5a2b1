//! Transaction data aggregation and transformation for cards and charts.
//!
//! Provides functions to total income and expenses, group expenses by
//! category, and lay out monthly data for chart display.

use std::collections::HashMap;

use time::Date;

use crate::{
    calendar::{add_months, month_bounds, month_label},
    dashboard::transaction::{DashboardTransaction, UNCATEGORIZED_LABEL},
};

/// The number of months shown in the dashboard charts, including the current month.
pub(super) const CHART_MONTHS: i32 = 12;

/// Income and expense totals over some period.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(super) struct PeriodTotals {
    pub income: f64,
    pub expenses: f64,
}

impl PeriodTotals {
    /// Income minus expenses.
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }

    fn add(&mut self, transaction: &DashboardTransaction) {
        if transaction.is_income() {
            self.income += transaction.amount;
        } else if transaction.is_expense() {
            self.expenses += transaction.amount;
        }
    }
}

/// Totals the income and expenses in `transactions`.
pub(super) fn sum_totals(transactions: &[DashboardTransaction]) -> PeriodTotals {
    let mut totals = PeriodTotals::default();

    for transaction in transactions {
        totals.add(transaction);
    }

    totals
}

/// Totals the expenses in `transactions` per category.
///
/// # Returns
/// (category name, total) pairs, largest first, with uncategorized expenses
/// sorted last as "Other".
pub(super) fn expenses_by_category(transactions: &[DashboardTransaction]) -> Vec<(String, f64)> {
    let mut totals: HashMap<Option<&str>, f64> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        *totals.entry(transaction.category.as_deref()).or_insert(0.0) += transaction.amount;
    }

    let mut sorted: Vec<(Option<&str>, f64)> = totals.into_iter().collect();

    sorted.sort_by(|(a_name, a_total), (b_name, b_total)| {
        a_name
            .is_none()
            .cmp(&b_name.is_none())
            .then_with(|| b_total.total_cmp(a_total))
            .then_with(|| a_name.cmp(b_name))
    });

    sorted
        .into_iter()
        .map(|(category, total)| (category_label(category), total))
        .collect()
}

fn category_label(category: Option<&str>) -> String {
    category.unwrap_or(UNCATEGORIZED_LABEL).to_owned()
}

/// The first day of each of the last [CHART_MONTHS] months, oldest first, ending with the month of `today`.
pub(super) fn last_twelve_months(today: Date) -> Vec<Date> {
    let this_month = month_bounds(today).start;

    (1 - CHART_MONTHS..=0)
        .map(|offset| add_months(this_month, offset, 1))
        .collect()
}

/// Formats month dates as labels like "Mar 2025".
pub(super) fn format_month_labels(months: &[Date]) -> Vec<String> {
    months.iter().copied().map(month_label).collect()
}

/// Totals income and expenses for each month in `months`.
///
/// # Returns
/// One entry per month in `months`, zero for months without transactions.
pub(super) fn monthly_totals(
    transactions: &[DashboardTransaction],
    months: &[Date],
) -> Vec<PeriodTotals> {
    let mut totals_by_month: HashMap<Date, PeriodTotals> = HashMap::new();

    for transaction in transactions {
        totals_by_month
            .entry(month_bounds(transaction.date).start)
            .or_default()
            .add(transaction);
    }

    months
        .iter()
        .map(|month| totals_by_month.get(month).copied().unwrap_or_default())
        .collect()
}

/// Groups expense transactions by category and calculates monthly totals.
///
/// Returns data in a format suitable for ECharts stacked bar charts, with
/// uncategorized expenses sorted last as "Other".
///
/// # Returns
/// Vector of (category name, monthly values) tuples where monthly values has
/// one entry per month in `months`, with `None` for months with no expenses.
pub(super) fn group_monthly_expenses_by_category(
    transactions: &[DashboardTransaction],
    months: &[Date],
) -> Vec<(String, Vec<Option<f64>>)> {
    let mut totals_by_category: HashMap<Option<&str>, HashMap<Date, f64>> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        *totals_by_category
            .entry(transaction.category.as_deref())
            .or_default()
            .entry(month_bounds(transaction.date).start)
            .or_insert(0.0) += transaction.amount;
    }

    let mut categories: Vec<Option<&str>> = totals_by_category
        .keys()
        .copied()
        .filter(Option::is_some)
        .collect();
    categories.sort();

    if totals_by_category.contains_key(&None) {
        categories.push(None);
    }

    categories
        .into_iter()
        .map(|category| {
            let by_month = &totals_by_category[&category];
            let monthly_data = months
                .iter()
                .map(|month| by_month.get(month).copied())
                .collect();

            (category_label(category), monthly_data)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use crate::{
        dashboard::transaction::{DashboardTransaction, UNCATEGORIZED_LABEL},
        transaction::TransactionType,
    };

    use super::{
        PeriodTotals, expenses_by_category, format_month_labels, group_monthly_expenses_by_category,
        last_twelve_months, monthly_totals, sum_totals,
    };

    fn expense(amount: f64, date: Date, category: &str) -> DashboardTransaction {
        DashboardTransaction {
            amount,
            date,
            transaction_type: TransactionType::Expense,
            category: Some(category.to_owned()),
        }
    }

    fn uncategorized_expense(amount: f64, date: Date) -> DashboardTransaction {
        DashboardTransaction {
            amount,
            date,
            transaction_type: TransactionType::Expense,
            category: None,
        }
    }

    fn income(amount: f64, date: Date) -> DashboardTransaction {
        DashboardTransaction {
            amount,
            date,
            transaction_type: TransactionType::Income,
            category: None,
        }
    }

    #[test]
    fn sums_income_and_expenses() {
        let transactions = vec![
            income(1000.0, date!(2024 - 01 - 01)),
            expense(100.0, date!(2024 - 01 - 15), "Food"),
            expense(50.0, date!(2024 - 01 - 20), "Transport"),
        ];

        let totals = sum_totals(&transactions);

        assert_eq!(
            totals,
            PeriodTotals {
                income: 1000.0,
                expenses: 150.0
            }
        );
        assert_eq!(totals.net(), 850.0);
    }

    #[test]
    fn expenses_by_category_puts_other_last() {
        let transactions = vec![
            uncategorized_expense(500.0, date!(2024 - 01 - 15)),
            expense(20.0, date!(2024 - 01 - 15), "Alpha"),
            expense(100.0, date!(2024 - 01 - 16), "Zebra"),
            expense(10.0, date!(2024 - 01 - 17), "Alpha"),
            income(2000.0, date!(2024 - 01 - 01)),
        ];

        let result = expenses_by_category(&transactions);

        assert_eq!(
            result,
            vec![
                ("Zebra".to_owned(), 100.0),
                ("Alpha".to_owned(), 30.0),
                (UNCATEGORIZED_LABEL.to_owned(), 500.0),
            ]
        );
    }

    #[test]
    fn category_named_other_is_not_merged_with_uncategorized() {
        let transactions = vec![
            expense(40.0, date!(2024 - 01 - 15), UNCATEGORIZED_LABEL),
            uncategorized_expense(10.0, date!(2024 - 01 - 16)),
        ];
        let months = vec![date!(2024 - 01 - 01)];

        assert_eq!(
            expenses_by_category(&transactions),
            vec![
                (UNCATEGORIZED_LABEL.to_owned(), 40.0),
                (UNCATEGORIZED_LABEL.to_owned(), 10.0),
            ]
        );
        assert_eq!(
            group_monthly_expenses_by_category(&transactions, &months),
            vec![
                (UNCATEGORIZED_LABEL.to_owned(), vec![Some(40.0)]),
                (UNCATEGORIZED_LABEL.to_owned(), vec![Some(10.0)]),
            ]
        );
    }

    #[test]
    fn last_twelve_months_ends_with_current_month() {
        let months = last_twelve_months(date!(2024 - 03 - 31));

        assert_eq!(months.len(), 12);
        assert_eq!(months[0], date!(2023 - 04 - 01));
        assert_eq!(months[11], date!(2024 - 03 - 01));
        assert_eq!(
            format_month_labels(&months[10..]),
            vec!["Feb 2024", "Mar 2024"]
        );
    }

    #[test]
    fn monthly_totals_fill_empty_months() {
        let transactions = vec![
            income(100.0, date!(2024 - 01 - 15)),
            expense(30.0, date!(2024 - 01 - 20), "Food"),
            expense(40.0, date!(2024 - 03 - 02), "Food"),
        ];
        let months = vec![
            date!(2024 - 01 - 01),
            date!(2024 - 02 - 01),
            date!(2024 - 03 - 01),
        ];

        let result = monthly_totals(&transactions, &months);

        assert_eq!(
            result,
            vec![
                PeriodTotals {
                    income: 100.0,
                    expenses: 30.0
                },
                PeriodTotals::default(),
                PeriodTotals {
                    income: 0.0,
                    expenses: 40.0
                },
            ]
        );
    }

    #[test]
    fn group_monthly_expenses_by_category_groups_correctly() {
        let transactions = vec![
            expense(100.0, date!(2024 - 01 - 15), "Food"),
            uncategorized_expense(50.0, date!(2024 - 01 - 20)),
            expense(30.0, date!(2024 - 02 - 10), "Food"),
            expense(5.0, date!(2024 - 02 - 11), "Alpha"),
            income(200.0, date!(2024 - 01 - 10)),
        ];
        let months = vec![date!(2024 - 01 - 01), date!(2024 - 02 - 01)];

        let result = group_monthly_expenses_by_category(&transactions, &months);

        assert_eq!(
            result,
            vec![
                ("Alpha".to_owned(), vec![None, Some(5.0)]),
                ("Food".to_owned(), vec![Some(100.0), Some(30.0)]),
                (UNCATEGORIZED_LABEL.to_owned(), vec![Some(50.0), None]),
            ]
        );
    }
}
