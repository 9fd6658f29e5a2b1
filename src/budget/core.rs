//! Monthly spending limits per category and their progress.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    calendar::DateRange,
    category::{CategoryId, CategoryName},
    database_id::DatabaseId,
    db::row_exists,
};

/// Database identifier for a budget.
pub type BudgetId = DatabaseId;

/// A monthly spending limit for a category.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: BudgetId,
    pub category_id: CategoryId,
    /// The most that should be spent in the category each month.
    pub amount: f64,
}

/// The form data for creating or editing a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetForm {
    pub category_id: CategoryId,
    pub amount: f64,
}

/// How spending compares to a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Less than 80% of the budget has been spent.
    UnderBudget,
    /// Between 80% and 100% of the budget has been spent.
    NearLimit,
    /// More than the budget has been spent.
    OverBudget,
}

impl BudgetStatus {
    /// Classify spending given as a percentage of the budget.
    pub fn from_percent(percent: f64) -> Self {
        if percent > 100.0 {
            BudgetStatus::OverBudget
        } else if percent >= 80.0 {
            BudgetStatus::NearLimit
        } else {
            BudgetStatus::UnderBudget
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::UnderBudget => "On track",
            BudgetStatus::NearLimit => "Near limit",
            BudgetStatus::OverBudget => "Over budget",
        }
    }
}

/// A budget with the spending in its category over a period.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub category_name: CategoryName,
    pub category_icon: String,
    pub category_color: String,
    /// The sum of the expenses in the category.
    pub spent: f64,
}

impl BudgetProgress {
    /// The amount left to spend, negative when over budget.
    pub fn remaining(&self) -> f64 {
        self.budget.amount - self.spent
    }

    /// The spending as a percentage of the budget.
    pub fn percent(&self) -> f64 {
        self.spent / self.budget.amount * 100.0
    }

    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::from_percent(self.percent())
    }
}

fn validate(form: &BudgetForm, connection: &Connection) -> Result<(), Error> {
    if !form.amount.is_finite() || form.amount <= 0.0 {
        return Err(Error::NonPositiveAmount(form.amount));
    }

    if !row_exists("category", form.category_id, connection)? {
        return Err(Error::InvalidCategory(Some(form.category_id)));
    }

    Ok(())
}

/// Create a budget for a category.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if the amount is not greater than zero,
/// - [Error::InvalidCategory] if the category does not exist,
/// - [Error::DuplicateBudget] if the category already has a budget,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(form: &BudgetForm, connection: &Connection) -> Result<Budget, Error> {
    validate(form, connection)?;

    connection
        .prepare(
            "INSERT INTO budget (category_id, amount) VALUES (?1, ?2)
             RETURNING id, category_id, amount",
        )?
        .query_row((form.category_id, form.amount), map_budget_row)
        .map_err(|error| error.into())
}

/// Retrieve a budget by its `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a budget.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare("SELECT id, category_id, amount FROM budget WHERE id = :id")?
        .query_row(&[(":id", &id)], map_budget_row)
        .map_err(|error| error.into())
}

/// Update the category and amount of a budget.
///
/// # Errors
/// Returns [Error::UpdateMissingBudget] if `id` does not refer to a budget, or
/// the validation errors of [create_budget].
pub fn update_budget(id: BudgetId, form: &BudgetForm, connection: &Connection) -> Result<(), Error> {
    validate(form, connection)?;

    let rows_affected = connection.execute(
        "UPDATE budget SET category_id = ?1, amount = ?2 WHERE id = ?3",
        (form.category_id, form.amount, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    Ok(())
}

/// Delete a budget.
///
/// # Errors
/// Returns [Error::DeleteMissingBudget] if `id` does not refer to a budget.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Get every budget with the expenses in its category between the dates of
/// `period`, ordered by category name.
///
/// Income and transfers do not count towards a budget.
pub fn get_budget_progress(
    period: DateRange,
    connection: &Connection,
) -> Result<Vec<BudgetProgress>, Error> {
    connection
        .prepare(
            "SELECT b.id, b.category_id, b.amount, c.name, c.icon, c.color,
                COALESCE(SUM(t.amount), 0)
             FROM budget b
             INNER JOIN category c ON c.id = b.category_id
             LEFT JOIN \"transaction\" t
                ON t.category_id = b.category_id
                AND t.transaction_type = 'expense'
                AND t.date BETWEEN :start AND :end
             GROUP BY b.id
             ORDER BY c.name ASC",
        )?
        .query_map(
            rusqlite::named_params! {":start": period.start, ":end": period.end},
            |row| {
                let raw_name: String = row.get(3)?;

                Ok(BudgetProgress {
                    budget: map_budget_row(row)?,
                    category_name: CategoryName::new_unchecked(&raw_name),
                    category_icon: row.get(4)?,
                    category_color: row.get(5)?,
                    spent: row.get(6)?,
                })
            },
        )?
        .map(|maybe_progress| maybe_progress.map_err(|error| error.into()))
        .collect()
}

/// Create the budget table.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            category_id INTEGER NOT NULL UNIQUE,
            amount REAL NOT NULL CHECK (amount > 0),
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category_id: row.get(1)?,
        amount: row.get(2)?,
    })
}

#[cfg(test)]
mod status_tests {
    use super::BudgetStatus;

    #[test]
    fn classifies_percentages() {
        assert_eq!(BudgetStatus::from_percent(0.0), BudgetStatus::UnderBudget);
        assert_eq!(BudgetStatus::from_percent(79.9), BudgetStatus::UnderBudget);
        assert_eq!(BudgetStatus::from_percent(80.0), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::from_percent(100.0), BudgetStatus::NearLimit);
        assert_eq!(BudgetStatus::from_percent(100.1), BudgetStatus::OverBudget);
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        account::{AccountForm, AccountKind, create_account},
        calendar::month_bounds,
        category::{CategoryName, create_category, delete_category},
        test_utils::get_test_connection,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{
        BudgetForm, BudgetStatus, create_budget, delete_budget, get_budget, get_budget_progress,
        update_budget,
    };

    fn create_test_category(name: &str, connection: &Connection) -> i64 {
        create_category(CategoryName::new_unchecked(name), "", "#ffffff", connection)
            .unwrap()
            .id
    }

    #[test]
    fn create_and_get() {
        let conn = get_test_connection();
        let category_id = create_test_category("Food", &conn);

        let budget = create_budget(
            &BudgetForm {
                category_id,
                amount: 400.0,
            },
            &conn,
        )
        .unwrap();

        assert_eq!(get_budget(budget.id, &conn), Ok(budget));
    }

    #[test]
    fn one_budget_per_category() {
        let conn = get_test_connection();
        let category_id = create_test_category("Food", &conn);
        let form = BudgetForm {
            category_id,
            amount: 400.0,
        };
        create_budget(&form, &conn).unwrap();

        assert_eq!(create_budget(&form, &conn), Err(Error::DuplicateBudget));
    }

    #[test]
    fn rejects_invalid_form() {
        let conn = get_test_connection();
        let category_id = create_test_category("Food", &conn);

        assert_eq!(
            create_budget(
                &BudgetForm {
                    category_id,
                    amount: -5.0
                },
                &conn
            ),
            Err(Error::NonPositiveAmount(-5.0))
        );
        assert_eq!(
            create_budget(
                &BudgetForm {
                    category_id: 99,
                    amount: 5.0
                },
                &conn
            ),
            Err(Error::InvalidCategory(Some(99)))
        );
    }

    #[test]
    fn update_and_delete_missing() {
        let conn = get_test_connection();
        let category_id = create_test_category("Food", &conn);
        let form = BudgetForm {
            category_id,
            amount: 1.0,
        };

        assert_eq!(update_budget(3, &form, &conn), Err(Error::UpdateMissingBudget));
        assert_eq!(delete_budget(3, &conn), Err(Error::DeleteMissingBudget));
    }

    #[test]
    fn deleting_category_deletes_budget() {
        let conn = get_test_connection();
        let category_id = create_test_category("Food", &conn);
        let budget = create_budget(
            &BudgetForm {
                category_id,
                amount: 1.0,
            },
            &conn,
        )
        .unwrap();

        delete_category(category_id, &conn).unwrap();

        assert_eq!(get_budget(budget.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn progress_counts_expenses_in_month() {
        let conn = get_test_connection();
        let account = create_account(
            &AccountForm::new("Everyday", AccountKind::Checking, 0.0),
            &conn,
        )
        .unwrap();
        let food = create_test_category("Food", &conn);
        let fun = create_test_category("Fun", &conn);
        create_budget(
            &BudgetForm {
                category_id: food,
                amount: 200.0,
            },
            &conn,
        )
        .unwrap();
        create_budget(
            &BudgetForm {
                category_id: fun,
                amount: 50.0,
            },
            &conn,
        )
        .unwrap();
        for (amount, date, transaction_type, category_id) in [
            (150.0, date!(2025 - 03 - 02), TransactionType::Expense, food),
            (20.0, date!(2025 - 03 - 31), TransactionType::Expense, food),
            (500.0, date!(2025 - 02 - 28), TransactionType::Expense, food),
            (75.0, date!(2025 - 03 - 10), TransactionType::Income, food),
            (60.0, date!(2025 - 03 - 15), TransactionType::Expense, fun),
        ] {
            create_transaction(
                Transaction::build(amount, date, "", account.id)
                    .transaction_type(transaction_type)
                    .category_id(Some(category_id)),
                &conn,
            )
            .unwrap();
        }

        let progress = get_budget_progress(month_bounds(date!(2025 - 03 - 20)), &conn).unwrap();

        assert_eq!(progress.len(), 2);
        assert_eq!(progress[0].category_name.as_ref(), "Food");
        assert_eq!(progress[0].spent, 170.0);
        assert_eq!(progress[0].remaining(), 30.0);
        assert_eq!(progress[0].percent(), 85.0);
        assert_eq!(progress[0].status(), BudgetStatus::NearLimit);
        assert_eq!(progress[1].spent, 60.0);
        assert_eq!(progress[1].status(), BudgetStatus::OverBudget);
    }
}
