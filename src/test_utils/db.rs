use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::db::initialize;

/// An in-memory database with every table created.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

/// [get_test_connection] wrapped for use in handler states.
pub(crate) fn get_test_db_connection() -> Arc<Mutex<Connection>> {
    Arc::new(Mutex::new(get_test_connection()))
}
