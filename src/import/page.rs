//! The import wizard: upload a file, map its columns, then import the rows.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts},
    alert::Alert,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, link,
    },
    import::{
        commit::import_rows,
        mapping::{DateFormat, ImportForm},
        table::{RawTable, parse_csv_table, parse_xlsx_table},
    },
    navigation::NavBar,
    timezone::local_today,
};

/// The number of rows shown in the preview of an uploaded file.
const PREVIEW_ROWS: usize = 5;

/// The state needed for importing transactions.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn upload_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::IMPORT_UPLOAD)
            enctype="multipart/form-data"
            hx-target="#import-step"
            hx-swap="innerHTML"
            hx-target-error="#alert-container"
            hx-disabled-elt="#file, #upload-button"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="file" class=(FORM_LABEL_STYLE) { "Choose a file to upload" }

                input
                    id="file"
                    type="file"
                    name="file"
                    accept=".csv,.xlsx,text/csv,application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                p class="mt-1 text-sm text-gray-500 dark:text-gray-400"
                {
                    "Export your bank statement as a CSV or XLSX file. "
                    "You will choose which columns hold the date, description and amount next."
                }
            }

            button type="submit" id="upload-button" class=(BUTTON_PRIMARY_STYLE) { "Upload File" }
        }
    }
}

/// Route handler for the import page.
pub async fn get_import_page() -> Response {
    let nav_bar = NavBar::new(endpoints::IMPORT_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Import Transactions" }
            div id="import-step" class="w-full" { (upload_form_view()) }
        }
    };

    base("Import Transactions", &[], &content).into_response()
}

/// Route handler for the first step of an import.
///
/// Reads the uploaded CSV or XLSX file and responds with the column mapping
/// form and a preview of the first rows.
pub async fn upload_import_file(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Response {
    let table = match multipart.next_field().await {
        Ok(Some(field)) => read_table(field).await,
        Ok(None) => Err(Error::MultipartError("no file was uploaded".to_owned())),
        Err(error) => Err(Error::MultipartError(error.to_string())),
    };

    let table = match table {
        Ok(table) => table,
        Err(error) => {
            tracing::error!("Could not read uploaded file: {error}");
            return error.into_alert_response();
        }
    };

    let csv_data = match table.to_csv() {
        Ok(csv_data) => csv_data,
        Err(error) => {
            tracing::error!("Could not re-serialize uploaded file: {error}");
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

    match get_all_accounts(&connection) {
        Ok(accounts) => mapping_form_view(&table, &csv_data, &accounts).into_response(),
        Err(error) => {
            tracing::error!("Failed to retrieve accounts: {error}");
            error.into_alert_response()
        }
    }
}

async fn read_table(field: Field<'_>) -> Result<RawTable, Error> {
    let file_name = field.file_name().unwrap_or_default().to_lowercase();
    let content_type = field.content_type().unwrap_or_default().to_owned();

    let is_xlsx = file_name.ends_with(".xlsx") || content_type.contains("spreadsheetml");
    let is_csv = file_name.ends_with(".csv") || content_type == "text/csv";

    let bytes = field
        .bytes()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?;

    if is_xlsx {
        parse_xlsx_table(bytes.to_vec())
    } else if is_csv {
        let text =
            String::from_utf8(bytes.to_vec()).map_err(|error| Error::InvalidCSV(error.to_string()))?;
        parse_csv_table(&text)
    } else {
        Err(Error::UnsupportedFileType)
    }
}

fn column_select(
    name: &str,
    label: &str,
    headers: &[String],
    selected: Option<usize>,
    optional: bool,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) required[!optional] class=(FORM_TEXT_INPUT_STYLE)
            {
                @if optional {
                    option value="" selected[selected.is_none()] { "Not used" }
                }

                @for (index, header) in headers.iter().enumerate() {
                    option value=(index) selected[selected == Some(index)]
                    {
                        @if header.is_empty() {
                            "Column " (index + 1)
                        } @else {
                            (header)
                        }
                    }
                }
            }
        }
    }
}

/// Guess a column by looking for one of `names` in the headers.
fn guess_column(headers: &[String], names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.to_lowercase();
        names.iter().any(|name| header.contains(name))
    })
}

fn mapping_form_view(table: &RawTable, csv_data: &str, accounts: &[Account]) -> Markup {
    if accounts.is_empty() {
        return html! {
            p
            {
                "Transactions are imported into an account. "
                (link(endpoints::NEW_ACCOUNT_VIEW, "Create an account"))
                " first."
            }
        };
    }

    let headers = &table.headers;
    let date_column = guess_column(headers, &["date"]).unwrap_or(0);
    let description_column = guess_column(headers, &["description", "payee", "memo", "details"])
        .unwrap_or(1.min(headers.len().saturating_sub(1)));
    let amount_column = guess_column(headers, &["amount"]);

    html! {
        form
            hx-post=(endpoints::IMPORT)
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            input type="hidden" name="csv_data" value=(csv_data);

            div
            {
                label for="account_id" class=(FORM_LABEL_STYLE) { "Import into account" }

                select name="account_id" id="account_id" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for account in accounts {
                        option value=(account.id) { (account.name) }
                    }
                }
            }

            (column_select("date_column", "Date column", headers, Some(date_column), false))

            div
            {
                label for="date_format" class=(FORM_LABEL_STYLE) { "Date format" }

                select name="date_format" id="date_format" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for date_format in DateFormat::ALL {
                        option value=(date_format.as_str()) { (date_format.label()) }
                    }
                }
            }

            (column_select("description_column", "Description column", headers, Some(description_column), false))

            (column_select("amount_column", "Amount column (negative for money out)", headers, amount_column, true))

            p class="text-sm text-gray-500 dark:text-gray-400"
            {
                "Or, if money out and money in are in separate columns:"
            }

            (column_select("debit_column", "Debit column", headers, None, true))
            (column_select("credit_column", "Credit column", headers, None, true))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Import Transactions" }
        }

        (preview_view(table))
    }
}

fn preview_view(table: &RawTable) -> Markup {
    html! {
        div class="overflow-x-auto mt-6"
        {
            p class="mb-2 text-sm text-gray-500 dark:text-gray-400"
            {
                "Showing " (table.rows.len().min(PREVIEW_ROWS)) " of " (table.rows.len()) " rows."
            }

            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        @for header in &table.headers {
                            th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                        }
                    }
                }

                tbody
                {
                    @for row in table.rows.iter().take(PREVIEW_ROWS) {
                        tr class=(TABLE_ROW_STYLE) data-preview-row="true"
                        {
                            @for cell in row {
                                td class=(TABLE_CELL_STYLE) { (cell) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Route handler for the second step of an import, imports the rows with the chosen column mapping.
pub async fn import_transactions_endpoint(
    State(state): State<ImportState>,
    Form(form): Form<ImportForm>,
) -> Response {
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

    let start_time = std::time::Instant::now();

    match import_rows(&form, today, &connection) {
        Ok(summary) => {
            tracing::info!(
                "Imported {} transactions in {}ms",
                summary.imported,
                start_time.elapsed().as_millis()
            );

            (
                StatusCode::CREATED,
                Alert::Success {
                    message: format!("Imported {} transactions", summary.imported),
                    details: format!(
                        "{} duplicates and {} invalid rows were skipped. {} transactions were categorized.",
                        summary.duplicates, summary.skipped, summary.categorized
                    ),
                }
                .into_html(),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not import transactions: {error}");
            error.into_alert_response()
        }
    }
}
