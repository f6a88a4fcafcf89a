//! Implements a SQLite backed journal store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error, Transaction, TransactionBuilder, TransactionId,
    stores::{SortOrder, StoreQuery, TransactionStore},
};

const COLUMNS: &str = "id, doc_date, doc_no, doc_type, counterparty, description, category, \
    gl_code, amount_net, vat_amount, amount_gross, payment_method, bank_account, status, \
    payment_date";

/// Stores journal transactions in a SQLite database.
///
/// The schema must have been set up with
/// [initialize](crate::initialize_db) before the store is used.
#[derive(Debug, Clone)]
pub struct SqliteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
        let amount_net: f64 = row.get(8)?;
        let vat_amount: f64 = row.get(9)?;
        let amount_gross: f64 = row.get(10)?;

        // Rows persisted with a blank gross column are repaired on the
        // way out so every consumer sees the settled figure.
        let amount_gross = if amount_gross == 0.0 && (amount_net != 0.0 || vat_amount != 0.0) {
            amount_net + vat_amount
        } else {
            amount_gross
        };

        Ok(Transaction {
            id: row.get(0)?,
            doc_date: row.get(1)?,
            doc_no: row.get(2)?,
            doc_type: row.get(3)?,
            counterparty: row.get(4)?,
            description: row.get(5)?,
            category: row.get(6)?,
            gl_code: row.get(7)?,
            amount_net,
            vat_amount,
            amount_gross,
            payment_method: row.get(11)?,
            bank_account: row.get(12)?,
            status: row.get(13)?,
            payment_date: row.get(14)?,
        })
    }
}

impl TransactionStore for SqliteTransactionStore {
    /// Retrieve every transaction in the journal, oldest first.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn load_all(&self) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {COLUMNS} FROM journal ORDER BY doc_date ASC, id ASC"
            ))?
            .query_map([], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Atomically replace the whole journal with `builders`.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error; in that case the journal is left as it was.
    fn replace_all(
        &mut self,
        builders: Vec<TransactionBuilder>,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = self.connection.lock().unwrap();

        let tx = connection.unchecked_transaction()?;
        tx.execute("DELETE FROM journal", ())?;

        let mut stored = Vec::with_capacity(builders.len());

        {
            let mut statement = tx.prepare(&format!(
                "INSERT INTO journal (doc_date, doc_no, doc_type, counterparty, description, \
                 category, gl_code, amount_net, vat_amount, amount_gross, payment_method, \
                 bank_account, status, payment_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                 RETURNING {COLUMNS}"
            ))?;

            for builder in builders {
                let transaction = statement.query_row(
                    (
                        builder.doc_date,
                        builder.doc_no,
                        builder.doc_type,
                        builder.counterparty,
                        builder.description,
                        builder.category,
                        builder.gl_code,
                        builder.amount_net,
                        builder.vat_amount,
                        builder.amount_gross,
                        builder.payment_method,
                        builder.bank_account,
                        builder.status,
                        builder.payment_date,
                    ),
                    Self::map_row,
                )?;

                stored.push(transaction);
            }
        }

        tx.commit()?;
        Ok(stored)
    }

    /// Create a new transaction in the journal.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn insert(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO journal (doc_date, doc_no, doc_type, counterparty, description, \
                 category, gl_code, amount_net, vat_amount, amount_gross, payment_method, \
                 bank_account, status, payment_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    builder.doc_date,
                    builder.doc_no,
                    builder.doc_type,
                    builder.counterparty,
                    builder.description,
                    builder.category,
                    builder.gl_code,
                    builder.amount_net,
                    builder.vat_amount,
                    builder.amount_gross,
                    builder.payment_method,
                    builder.bank_account,
                    builder.status,
                    builder.payment_date,
                ),
                Self::map_row,
            )?;

        Ok(transaction)
    }

    /// Replace the transaction `id` with `builder`, keeping the ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if `id` is not in the journal,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &mut self,
        id: TransactionId,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error> {
        let connection = self.connection.lock().unwrap();

        connection
            .prepare(&format!(
                "UPDATE journal SET doc_date = ?1, doc_no = ?2, doc_type = ?3, \
                 counterparty = ?4, description = ?5, category = ?6, gl_code = ?7, \
                 amount_net = ?8, vat_amount = ?9, amount_gross = ?10, payment_method = ?11, \
                 bank_account = ?12, status = ?13, payment_date = ?14
                 WHERE id = ?15
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    builder.doc_date,
                    builder.doc_no,
                    builder.doc_type,
                    builder.counterparty,
                    builder.description,
                    builder.category,
                    builder.gl_code,
                    builder.amount_net,
                    builder.vat_amount,
                    builder.amount_gross,
                    builder.payment_method,
                    builder.bank_account,
                    builder.status,
                    builder.payment_date,
                    id,
                ),
                Self::map_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
                error => error.into(),
            })
    }

    /// Remove the transaction `id` from the journal.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if `id` is not in the journal,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: TransactionId) -> Result<(), Error> {
        let rows_deleted = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM journal WHERE id = ?1", (id,))?;

        if rows_deleted == 0 {
            return Err(Error::DeleteMissingTransaction);
        }

        Ok(())
    }

    /// Retrieve a transaction in the journal by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a stored transaction,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        let transaction = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {COLUMNS} FROM journal WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(transaction)
    }

    /// Query for transactions in the journal.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn query(&self, query: StoreQuery) -> Result<Vec<Transaction>, Error> {
        let mut query_string_parts = vec![format!("SELECT {COLUMNS} FROM journal")];
        let mut query_parameters = vec![];

        if let Some(date_range) = query.date_range {
            query_string_parts.push(format!(
                "WHERE doc_date BETWEEN ?{} AND ?{}",
                query_parameters.len() + 1,
                query_parameters.len() + 2,
            ));
            query_parameters.push(Value::Text(date_range.start().to_string()));
            query_parameters.push(Value::Text(date_range.end().to_string()));
        }

        match query.sort_date {
            Some(SortOrder::Ascending) => {
                query_string_parts.push("ORDER BY doc_date ASC, id ASC".to_string())
            }
            Some(SortOrder::Descending) => {
                query_string_parts.push("ORDER BY doc_date DESC, id ASC".to_string())
            }
            None => {}
        }

        if let Some(limit) = query.limit {
            query_string_parts.push(format!("LIMIT {limit} OFFSET {}", query.offset));
        }

        let query_string = query_string_parts.join(" ");
        let params = params_from_iter(query_parameters.iter());

        self.connection
            .lock()
            .unwrap()
            .prepare(&query_string)?
            .query_map(params, Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Get the total number of transactions in the journal.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL
    /// error.
    fn count(&self) -> Result<usize, Error> {
        self.connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM journal;", [], |row| row.get(0))
            .map_err(|error| error.into())
    }
}
