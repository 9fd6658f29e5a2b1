//! How the columns of an uploaded file map to transaction fields.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, account::AccountId};

/// The date formats accepted for the date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    #[default]
    YearMonthDay,
    /// `DD/MM/YYYY`
    DayMonthYear,
    /// `MM/DD/YYYY`
    MonthDayYear,
    /// `YYYY/MM/DD`
    YearMonthDaySlash,
}

const ISO_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

impl DateFormat {
    pub const ALL: [DateFormat; 4] = [
        DateFormat::YearMonthDay,
        DateFormat::DayMonthYear,
        DateFormat::MonthDayYear,
        DateFormat::YearMonthDaySlash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "year_month_day",
            DateFormat::DayMonthYear => "day_month_year",
            DateFormat::MonthDayYear => "month_day_year",
            DateFormat::YearMonthDaySlash => "year_month_day_slash",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "YYYY-MM-DD",
            DateFormat::DayMonthYear => "DD/MM/YYYY",
            DateFormat::MonthDayYear => "MM/DD/YYYY",
            DateFormat::YearMonthDaySlash => "YYYY/MM/DD",
        }
    }

    fn format_description(&self) -> &'static [BorrowedFormatItem<'static>] {
        match self {
            DateFormat::YearMonthDay => ISO_FORMAT,
            DateFormat::DayMonthYear => format_description!("[day padding:none]/[month padding:none]/[year]"),
            DateFormat::MonthDayYear => format_description!("[month padding:none]/[day padding:none]/[year]"),
            DateFormat::YearMonthDaySlash => format_description!("[year]/[month padding:none]/[day padding:none]"),
        }
    }

    /// Parse `text` in this format.
    ///
    /// Dates read from spreadsheet date cells are always `YYYY-MM-DD`, so
    /// that format is accepted as a fallback.
    pub fn parse(&self, text: &str) -> Option<Date> {
        let text = text.trim();

        Date::parse(text, self.format_description())
            .or_else(|_| Date::parse(text, ISO_FORMAT))
            .ok()
    }
}

/// Where the amount of each row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    /// One column where negative amounts are expenses and positive amounts are income.
    Signed(usize),
    /// Money out and money in are in separate columns.
    DebitCredit { debit: usize, credit: usize },
}

impl AmountColumns {
    /// The signed amount of `row`, negative for money out.
    ///
    /// Returns `None` if the amount cannot be parsed.
    pub fn signed_amount(&self, row: &[String]) -> Option<f64> {
        let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or_default();

        match *self {
            AmountColumns::Signed(index) => parse_amount(cell(index)),
            AmountColumns::DebitCredit { debit, credit } => {
                let debit = optional_amount(cell(debit))?;
                let credit = optional_amount(cell(credit))?;

                match (debit, credit) {
                    (None, None) => None,
                    (debit, credit) => {
                        Some(credit.unwrap_or_default().abs() - debit.unwrap_or_default().abs())
                    }
                }
            }
        }
    }
}

/// Parse an amount like `1,234.50`, `-$12.00` or `(12.00)`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.replace([',', '$', ' '], "");

    let amount = match cleaned
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => -inner.parse::<f64>().ok()?,
        None => cleaned.parse::<f64>().ok()?,
    };

    amount.is_finite().then_some(amount)
}

/// An empty cell is `Some(None)`, an unparseable cell is `None`.
fn optional_amount(raw: &str) -> Option<Option<f64>> {
    if raw.trim().is_empty() {
        Some(None)
    } else {
        parse_amount(raw).map(Some)
    }
}

/// The column mapping form submitted in the second step of an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportForm {
    /// The account the transactions are imported into.
    pub account_id: AccountId,
    /// The uploaded table re-serialized as CSV, header row first.
    pub csv_data: String,
    pub date_column: usize,
    #[serde(default)]
    pub date_format: DateFormat,
    pub description_column: usize,
    #[serde(default)]
    pub amount_column: Option<usize>,
    #[serde(default)]
    pub debit_column: Option<usize>,
    #[serde(default)]
    pub credit_column: Option<usize>,
}

impl ImportForm {
    /// Check the chosen columns against the number of columns in the header.
    ///
    /// # Errors
    /// Returns [Error::InvalidColumnMapping] if a column is out of range or no
    /// amount column is chosen.
    pub fn amount_columns(&self, column_count: usize) -> Result<AmountColumns, Error> {
        let check = |name: &str, index: usize| {
            if index < column_count {
                Ok(index)
            } else {
                Err(Error::InvalidColumnMapping(format!(
                    "the {name} column {} does not exist",
                    index + 1
                )))
            }
        };

        check("date", self.date_column)?;
        check("description", self.description_column)?;

        match (self.amount_column, self.debit_column, self.credit_column) {
            (Some(amount), _, _) => Ok(AmountColumns::Signed(check("amount", amount)?)),
            (None, Some(debit), Some(credit)) => Ok(AmountColumns::DebitCredit {
                debit: check("debit", debit)?,
                credit: check("credit", credit)?,
            }),
            _ => Err(Error::InvalidColumnMapping(
                "choose an amount column or both a debit and a credit column".to_owned(),
            )),
        }
    }
}
