//! Bulk import of journal rows from external tabular sources.

mod csv;
pub mod fields;

pub use csv::{ImportOutcome, parse_journal_csv};
