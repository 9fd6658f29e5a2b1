//! Database operations for categories.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
    db::is_unique_violation,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicateCategoryName] if a category with the same name exists.
pub fn create_category(
    name: CategoryName,
    icon: &str,
    color: &str,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (name, icon, color) VALUES (?1, ?2, ?3)
             RETURNING id, name, icon, color",
        )?
        .query_row((name.as_ref(), icon, color), map_row)
        .map_err(|error| map_duplicate_name(error, &name))
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, icon, color FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, icon, color FROM category ORDER BY name ASC;")?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Update a category. Returns an error if the category doesn't exist.
pub fn update_category(
    category_id: CategoryId,
    name: CategoryName,
    icon: &str,
    color: &str,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1, icon = ?2, color = ?3 WHERE id = ?4",
            (name.as_ref(), icon, color, category_id),
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(())
}

/// Delete a category by ID.
///
/// Transactions and recurring transactions in the category become
/// uncategorized and the category's budget is deleted.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Count the transactions in each category.
pub fn count_transactions_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    connection
        .prepare(
            "SELECT category_id, COUNT(1) FROM \"transaction\"
             WHERE category_id IS NOT NULL GROUP BY category_id",
        )?
        .query_map((), |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_count| maybe_count.map_err(Error::from))
        .collect()
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            icon TEXT NOT NULL DEFAULT '',
            color TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &CategoryName) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateCategoryName(name.to_string())
    } else {
        error.into()
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let icon = row.get(2)?;
    let color = row.get(3)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        icon,
        color,
    })
}
