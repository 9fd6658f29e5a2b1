//! Importing bank statements from CSV and XLSX files.
//!
//! An import has two steps. The uploaded file is read into a table and shown
//! with a form for choosing which columns hold the date, description and
//! amount. Submitting that form turns each row into a transaction.

mod categorize;
mod commit;
mod mapping;
mod page;
mod table;

pub use page::{get_import_page, import_transactions_endpoint, upload_import_file};
