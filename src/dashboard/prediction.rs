//! Expense prediction for the current and next month.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    Error,
    calendar::{DateRange, add_months, month_bounds},
    dashboard::{
        aggregation::sum_totals,
        handlers::DashboardState,
        transaction::{get_first_transaction_date, get_transactions_in_date_range},
    },
    timezone::local_today,
};

/// The maximum number of previous full months used for the forecast.
const FORECAST_MONTHS: i32 = 6;

/// Spending so far this month and where it is heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpensePrediction {
    /// Expenses from the first of the month up to and including today.
    pub month_to_date_expenses: f64,
    /// Month-to-date expenses divided by the day of the month.
    pub daily_average: f64,
    /// The daily average over the whole month.
    pub projected_month_expenses: f64,
    /// A linear fit of previous months' expenses extended by one month.
    pub next_month_forecast: f64,
    /// The number of previous full months the forecast is based on.
    pub months_considered: usize,
}

/// Predict this month's and next month's expenses as of `today`.
///
/// The forecast uses the expense totals of up to six full months before the
/// current month, skipping months before the first transaction. Without
/// history the projection for this month is used instead.
///
/// # Errors
/// Returns [Error::SqlError] if a query fails.
pub fn predict_expenses(today: Date, connection: &Connection) -> Result<ExpensePrediction, Error> {
    let this_month = month_bounds(today);
    let month_to_date = get_transactions_in_date_range(
        DateRange {
            start: this_month.start,
            end: today,
        },
        connection,
    )?;

    let month_to_date_expenses = sum_totals(&month_to_date).expenses;
    let daily_average = month_to_date_expenses / f64::from(today.day());
    let projected_month_expenses = daily_average * f64::from(this_month.end.day());

    let monthly_expenses = previous_monthly_expenses(this_month.start, connection)?;
    let next_month_forecast = linear_forecast(&monthly_expenses)
        .unwrap_or(projected_month_expenses)
        .max(0.0);

    Ok(ExpensePrediction {
        month_to_date_expenses,
        daily_average,
        projected_month_expenses,
        next_month_forecast,
        months_considered: monthly_expenses.len(),
    })
}

/// The expense totals of the full months before `month_start`, oldest first.
fn previous_monthly_expenses(month_start: Date, connection: &Connection) -> Result<Vec<f64>, Error> {
    let Some(first_date) = get_first_transaction_date(connection)? else {
        return Ok(Vec::new());
    };

    let mut totals = Vec::new();

    for offset in 1..=FORECAST_MONTHS {
        let month = month_bounds(add_months(month_start, -offset, 1));

        if month.end < first_date {
            break;
        }

        let transactions = get_transactions_in_date_range(month, connection)?;
        totals.push(sum_totals(&transactions).expenses);
    }

    totals.reverse();

    Ok(totals)
}

/// Fit a least-squares line through `values` at x = 0, 1, ... and evaluate it at the next x.
///
/// A single value is returned as is. Returns `None` for no values.
fn linear_forecast(values: &[f64]) -> Option<f64> {
    match values {
        [] => None,
        [value] => Some(*value),
        _ => {
            let n = values.len() as f64;
            let mean_x = (n - 1.0) / 2.0;
            let mean_y = values.iter().sum::<f64>() / n;

            let (covariance, variance) = values.iter().enumerate().fold(
                (0.0, 0.0),
                |(covariance, variance), (x, y)| {
                    let dx = x as f64 - mean_x;
                    (covariance + dx * (y - mean_y), variance + dx * dx)
                },
            );

            let slope = covariance / variance;

            Some(mean_y + slope * (n - mean_x))
        }
    }
}

/// Route handler for the expense prediction as JSON.
pub async fn get_prediction(State(state): State<DashboardState>) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("could not get today's date: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match predict_expenses(today, &connection) {
        Ok(prediction) => Json(prediction).into_response(),
        Err(error) => {
            tracing::error!("Could not predict expenses: {error}");
            error.into_alert_response()
        }
    }
}
