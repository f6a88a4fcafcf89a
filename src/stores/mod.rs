//! Durable storage for the journal.
//!
//! The reports only ever need [TransactionStore::load_all]; the rest of
//! the trait exists so callers can choose between row-level edits and
//! wholesale replacement, whichever matches how their frontend works.

use std::ops::RangeInclusive;

use time::Date;

use crate::{Error, Transaction, TransactionBuilder, TransactionId};

mod sqlite;

pub use sqlite::SqliteTransactionStore;

/// Handles the persistence of journal transactions.
pub trait TransactionStore {
    /// Retrieve every transaction in the journal, oldest first.
    fn load_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Atomically replace the whole journal with `builders`.
    ///
    /// Either every row is written or none are. Returns the stored
    /// transactions with their newly assigned IDs.
    fn replace_all(&mut self, builders: Vec<TransactionBuilder>)
    -> Result<Vec<Transaction>, Error>;

    /// Create a new transaction in the journal.
    fn insert(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Replace the transaction `id` with `builder`, keeping the ID.
    ///
    /// Edits are whole-record: there is no field-level patching.
    fn update(
        &mut self,
        id: TransactionId,
        builder: TransactionBuilder,
    ) -> Result<Transaction, Error>;

    /// Remove the transaction `id` from the journal.
    fn delete(&mut self, id: TransactionId) -> Result<(), Error>;

    /// Retrieve a single transaction by its `id`.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve transactions the way `query` describes.
    fn query(&self, query: StoreQuery) -> Result<Vec<Transaction>, Error>;

    /// The number of transactions in the journal.
    fn count(&self) -> Result<usize, Error>;
}

/// Defines how transactions should be fetched from
/// [TransactionStore::query].
#[derive(Default)]
pub struct StoreQuery {
    /// Include transactions dated within `date_range` (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Selects up to the first N (`limit`) transactions.
    pub limit: Option<u64>,
    /// Skip the first `offset` transactions.
    pub offset: u64,
    /// Orders transactions by document date. None returns transactions
    /// in the order they are stored.
    pub sort_date: Option<SortOrder>,
}

/// The order to sort transactions in a [StoreQuery].
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}
