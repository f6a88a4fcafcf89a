//! Defteri is a bookkeeping engine for a single small-business ledger.
//!
//! The heart of the crate is a flat journal of financial transactions and
//! the pure reports derived from it: period profit and loss, VAT payable,
//! per-account cash balances, and aging of unpaid items. Around the engine
//! sit a SQLite-backed journal store, a tolerant CSV import adapter, and a
//! handful of small command line tools.

#![warn(missing_docs)]

pub mod checks;
mod db;
pub mod import;
pub mod ledger;
pub mod report;
pub mod stores;
mod transaction;
pub mod vat;

pub use db::initialize as initialize_db;
pub use transaction::{
    AMOUNT_EPSILON, DocType, PaymentMethod, PaymentStatus, Transaction, TransactionBuilder,
    TransactionFilter, TransactionId,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A negative amount was entered for a net or VAT figure.
    ///
    /// Journal rows record magnitudes; the document type carries the
    /// direction of the money flow.
    #[error("amounts must not be negative, got {0}")]
    NegativeAmount(f64),

    /// The entered net, VAT, and gross amounts do not add up.
    ///
    /// The record must never be persisted; the caller should surface the
    /// message and let the user correct the amounts.
    #[error("gross amount {gross} does not equal net {net} plus VAT {vat}")]
    AmountMismatch {
        /// The net amount the user entered.
        net: f64,
        /// The VAT amount the user entered.
        vat: f64,
        /// The gross amount the user entered.
        gross: f64,
    },

    /// A manually entered transaction is missing its counterparty.
    #[error("a counterparty is required")]
    MissingCounterparty,

    /// A manually entered transaction is missing its description.
    #[error("a description is required")]
    MissingDescription,

    /// A bank account name is required unless the payment method is credit.
    #[error("a bank or cash account is required for non-credit payments")]
    MissingBankAccount,

    /// The CSV had issues that prevented it from being read at all.
    ///
    /// Defects in individual rows or cells never raise this error; those
    /// degrade to safe defaults row by row.
    #[error("could not parse the CSV file: {0}")]
    InvalidCsv(String),

    /// The requested transaction could not be found.
    #[error("the requested transaction could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist.
    #[error("tried to update a transaction that is not in the journal")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist.
    #[error("tried to delete a transaction that is not in the journal")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
