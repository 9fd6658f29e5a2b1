//! Database operations for banks.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    bank::{Bank, BankId, BankName, NewBank},
    db::is_unique_violation,
};

/// Create a bank and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateBankName] if a bank with the same name exists.
pub fn create_bank(bank: NewBank, connection: &Connection) -> Result<Bank, Error> {
    connection
        .prepare(
            "INSERT INTO bank (name, color, logo_url) VALUES (?1, ?2, ?3)
             RETURNING id, name, color, logo_url",
        )?
        .query_row((bank.name.as_ref(), &bank.color, &bank.logo_url), map_row)
        .map_err(|error| map_duplicate_name(error, &bank.name))
}

/// Retrieve a single bank by ID.
pub fn get_bank(bank_id: BankId, connection: &Connection) -> Result<Bank, Error> {
    connection
        .prepare("SELECT id, name, color, logo_url FROM bank WHERE id = :id")?
        .query_row(&[(":id", &bank_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all banks ordered alphabetically by name.
pub fn get_all_banks(connection: &Connection) -> Result<Vec<Bank>, Error> {
    connection
        .prepare("SELECT id, name, color, logo_url FROM bank ORDER BY name ASC")?
        .query_map([], map_row)?
        .map(|maybe_bank| maybe_bank.map_err(|error| error.into()))
        .collect()
}

/// Update a bank. Returns an error if the bank doesn't exist.
pub fn update_bank(bank_id: BankId, bank: NewBank, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE bank SET name = ?1, color = ?2, logo_url = ?3 WHERE id = ?4",
            (bank.name.as_ref(), &bank.color, &bank.logo_url, bank_id),
        )
        .map_err(|error| map_duplicate_name(error, &bank.name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBank);
    }

    Ok(())
}

/// Delete a bank by ID. Accounts held at the bank are kept without a bank.
pub fn delete_bank(bank_id: BankId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM bank WHERE id = ?1", [bank_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBank);
    }

    Ok(())
}

/// Count the accounts held at each bank.
pub fn count_accounts_per_bank(connection: &Connection) -> Result<HashMap<BankId, u32>, Error> {
    connection
        .prepare("SELECT bank_id, COUNT(1) FROM account WHERE bank_id IS NOT NULL GROUP BY bank_id")?
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_count| maybe_count.map_err(Error::from))
        .collect()
}

/// Initialize the bank table.
pub fn create_bank_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS bank (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            color TEXT NOT NULL,
            logo_url TEXT
        )",
        (),
    )?;

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &BankName) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateBankName(name.to_string())
    } else {
        error.into()
    }
}

fn map_row(row: &Row) -> Result<Bank, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Bank {
        id: row.get(0)?,
        name: BankName::new_unchecked(&raw_name),
        color: row.get(2)?,
        logo_url: row.get(3)?,
    })
}

#[cfg(test)]
mod bank_query_tests {
    use crate::{
        Error,
        account::{AccountForm, AccountKind, create_account, get_account},
        bank::{
            BankName, NewBank, create_bank, db::count_accounts_per_bank, delete_bank,
            get_all_banks, get_bank, update_bank,
        },
        test_utils::get_test_connection,
    };

    fn new_bank(name: &str) -> NewBank {
        NewBank::new(BankName::new_unchecked(name))
    }

    #[test]
    fn create_bank_succeeds() {
        let connection = get_test_connection();

        let bank = create_bank(
            NewBank {
                name: BankName::new_unchecked("ANZ"),
                color: "#004165".to_owned(),
                logo_url: Some("https://example.com/anz.png".to_owned()),
            },
            &connection,
        )
        .expect("Could not create bank");

        assert_eq!(get_bank(bank.id, &connection), Ok(bank));
    }

    #[test]
    fn create_bank_fails_on_duplicate_name() {
        let connection = get_test_connection();
        create_bank(new_bank("ASB"), &connection).unwrap();

        let result = create_bank(new_bank("ASB"), &connection);

        assert_eq!(result, Err(Error::DuplicateBankName("ASB".to_owned())));
    }

    #[test]
    fn get_all_banks_is_sorted_by_name() {
        let connection = get_test_connection();
        create_bank(new_bank("Westpac"), &connection).unwrap();
        create_bank(new_bank("BNZ"), &connection).unwrap();

        let names: Vec<String> = get_all_banks(&connection)
            .unwrap()
            .into_iter()
            .map(|bank| bank.name.to_string())
            .collect();

        assert_eq!(names, ["BNZ", "Westpac"]);
    }

    #[test]
    fn update_bank_succeeds() {
        let connection = get_test_connection();
        let bank = create_bank(new_bank("Kiwi"), &connection).unwrap();

        update_bank(bank.id, new_bank("Kiwibank"), &connection).unwrap();

        assert_eq!(get_bank(bank.id, &connection).unwrap().name.as_ref(), "Kiwibank");
    }

    #[test]
    fn update_missing_bank_fails() {
        let connection = get_test_connection();

        assert_eq!(
            update_bank(42, new_bank("Nope"), &connection),
            Err(Error::UpdateMissingBank)
        );
    }

    #[test]
    fn delete_bank_clears_bank_on_accounts() {
        let connection = get_test_connection();
        let bank = create_bank(new_bank("TSB"), &connection).unwrap();
        let account = create_account(
            &AccountForm::new("Savings", AccountKind::Savings, 10.0).bank_id(Some(bank.id)),
            &connection,
        )
        .unwrap();
        assert_eq!(count_accounts_per_bank(&connection).unwrap()[&bank.id], 1);

        delete_bank(bank.id, &connection).expect("Could not delete bank");

        assert_eq!(get_bank(bank.id, &connection), Err(Error::NotFound));
        assert_eq!(get_account(account.id, &connection).unwrap().bank_id, None);
    }

    #[test]
    fn delete_missing_bank_fails() {
        let connection = get_test_connection();

        assert_eq!(delete_bank(42, &connection), Err(Error::DeleteMissingBank));
    }
}
