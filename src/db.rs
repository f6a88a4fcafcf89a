//! Schema setup for the journal database.

use rusqlite::Connection;

/// Create the journal table and its indices.
///
/// Safe to call on a database that already has the schema.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS journal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                doc_date TEXT NOT NULL,
                doc_no TEXT NOT NULL DEFAULT '',
                doc_type TEXT NOT NULL,
                counterparty TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                gl_code TEXT NOT NULL DEFAULT '',
                amount_net REAL NOT NULL,
                vat_amount REAL NOT NULL,
                amount_gross REAL NOT NULL,
                payment_method TEXT NOT NULL,
                bank_account TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                payment_date TEXT
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('journal', 0)",
        (),
    )?;

    // Date-range queries drive the dashboard, so index the document date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_journal_doc_date ON journal(doc_date);",
        (),
    )?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), initialize(&connection));
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        initialize(&connection).expect("Could not initialise schema");

        assert_eq!(Ok(()), initialize(&connection));
    }
}
