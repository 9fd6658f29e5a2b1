//! Reading uploaded CSV and XLSX files into a table of strings.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use time::{Date, Duration, macros::date};

use crate::Error;

/// The rows of an uploaded file with the first non-empty row as the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    fn from_rows(rows: impl Iterator<Item = Vec<String>>) -> Result<Self, Error> {
        let mut rows = rows.filter(|row| row.iter().any(|cell| !cell.is_empty()));

        let headers = rows
            .next()
            .ok_or_else(|| Error::InvalidCSV("the file has no rows".to_owned()))?;

        Ok(Self {
            headers,
            rows: rows.collect(),
        })
    }

    /// Write the table, header included, back out as CSV.
    pub fn to_csv(&self) -> Result<String, Error> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        writer
            .write_record(&self.headers)
            .map_err(|error| Error::InvalidCSV(error.to_string()))?;

        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|error| Error::InvalidCSV(error.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|error| Error::InvalidCSV(error.to_string()))?;

        String::from_utf8(bytes).map_err(|error| Error::InvalidCSV(error.to_string()))
    }
}

/// Parse CSV text, allowing rows of different lengths and trimming every cell.
///
/// # Errors
/// Returns [Error::InvalidCSV] if the text is not valid CSV or has no non-empty rows.
pub fn parse_csv_table(text: &str) -> Result<RawTable, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|record| record.iter().map(str::to_owned).collect::<Vec<_>>())
                .map_err(|error| Error::InvalidCSV(error.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    RawTable::from_rows(rows.into_iter())
}

/// Read the first worksheet of an XLSX file.
///
/// Date cells are converted to `YYYY-MM-DD` text.
///
/// # Errors
/// Returns [Error::InvalidSpreadsheet] if the file cannot be read or has no worksheets.
pub fn parse_xlsx_table(bytes: Vec<u8>) -> Result<RawTable, Error> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|error| Error::InvalidSpreadsheet(error.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::InvalidSpreadsheet("the workbook has no worksheets".to_owned()))?
        .map_err(|error| Error::InvalidSpreadsheet(error.to_string()))?;

    RawTable::from_rows(
        range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect()),
    )
    .map_err(|_| Error::InvalidSpreadsheet("the first worksheet has no rows".to_owned()))
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_owned(),
        Data::DateTime(date_time) => excel_serial_to_date(date_time.as_f64())
            .map(|date| date.to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(text) => text.get(..10).unwrap_or(text).to_owned(),
        other => other.to_string(),
    }
}

/// The serial number of 9999-12-31, the last date a spreadsheet can hold.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Convert a spreadsheet date serial number to a date.
///
/// Returns `None` for serials outside the range of spreadsheet dates.
fn excel_serial_to_date(serial: f64) -> Option<Date> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }

    // Day zero is 1899-12-30, which accounts for the 1900 leap year bug.
    date!(1899 - 12 - 30).checked_add(Duration::days(serial.trunc() as i64))
}
