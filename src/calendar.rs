//! Calendar month arithmetic shared by recurring transactions, budgets and the dashboard.

use time::{Date, Month};

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

/// The first and last day of the month that `date` falls in.
pub fn month_bounds(date: Date) -> DateRange {
    let year = date.year();
    let month = date.month();

    DateRange {
        start: Date::from_calendar_date(year, month, 1).expect("invalid month start date"),
        end: Date::from_calendar_date(year, month, last_day_of_month(year, month))
            .expect("invalid month end date"),
    }
}

/// Step `months` calendar months from the month of `date`, landing on
/// `anchor_day` or the last day of the target month if it is shorter.
///
/// Keeping the anchor day separate from `date` means a monthly series that
/// started on the 31st goes Jan 31, Feb 28, Mar 31 instead of drifting to the 28th.
pub fn add_months(date: Date, months: i32, anchor_day: u8) -> Date {
    let month_index = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + months;
    let year = month_index.div_euclid(12);
    let month = month_from_number((month_index.rem_euclid(12) + 1) as u8);
    let day = anchor_day.min(last_day_of_month(year, month));

    Date::from_calendar_date(year, month, day).expect("invalid date after adding months")
}

/// The number of days in `month` of `year`.
pub fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn month_from_number(month: u8) -> Month {
    match month {
        1 => Month::January,
        2 => Month::February,
        3 => Month::March,
        4 => Month::April,
        5 => Month::May,
        6 => Month::June,
        7 => Month::July,
        8 => Month::August,
        9 => Month::September,
        10 => Month::October,
        11 => Month::November,
        _ => Month::December,
    }
}

/// A short label for the month of `date`, e.g. "Mar 2025".
pub fn month_label(date: Date) -> String {
    let month = date.month().to_string();

    format!("{} {}", &month[..3], date.year())
}

/// Parse a month in the `YYYY-MM` format used by `<input type="month">`,
/// returning the first day of that month.
pub fn parse_month(text: &str) -> Option<Date> {
    let (year, month) = text.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    let month = Month::try_from(month).ok()?;

    Date::from_calendar_date(year, month, 1).ok()
}

/// Format the month of `date` in the `YYYY-MM` format.
pub fn format_month(date: Date) -> String {
    format!("{:04}-{:02}", date.year(), u8::from(date.month()))
}
