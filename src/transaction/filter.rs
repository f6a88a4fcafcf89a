//! In-memory filtering of a journal snapshot.

use std::ops::RangeInclusive;

use time::{Date, Month};

use super::core::{DocType, PaymentStatus, Transaction};

/// Selects the slice of the journal a report should run over.
///
/// Every field is optional; the default filter keeps everything. The
/// reports themselves are pure functions over whatever this hands them.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Keep transactions whose document date falls in this range
    /// (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
    /// Keep transactions with one of these document types.
    pub doc_types: Option<Vec<DocType>>,
    /// Keep transactions with this payment status.
    pub status: Option<PaymentStatus>,
    /// Keep transactions where any text field contains this needle,
    /// case-insensitively.
    pub search: Option<String>,
}

impl TransactionFilter {
    /// A filter covering one calendar year.
    pub fn year(year: i32) -> Self {
        let start = Date::from_calendar_date(year, Month::January, 1)
            .expect("January 1 exists in every year");
        let end = Date::from_calendar_date(year, Month::December, 31)
            .expect("December 31 exists in every year");

        Self {
            date_range: Some(start..=end),
            ..Default::default()
        }
    }

    /// Whether `transaction` passes every set criterion.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(date_range) = &self.date_range
            && !date_range.contains(&transaction.doc_date)
        {
            return false;
        }

        if let Some(doc_types) = &self.doc_types
            && !doc_types.contains(&transaction.doc_type)
        {
            return false;
        }

        if let Some(status) = self.status
            && transaction.status != status
        {
            return false;
        }

        if let Some(search) = &self.search
            && !self.matches_text(transaction, search)
        {
            return false;
        }

        true
    }

    /// Keep the matching transactions, preserving their order.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        transactions
            .iter()
            .filter(|transaction| self.matches(transaction))
            .cloned()
            .collect()
    }

    fn matches_text(&self, transaction: &Transaction, needle: &str) -> bool {
        let needle = needle.to_lowercase();

        [
            &transaction.doc_no,
            &transaction.counterparty,
            &transaction.description,
            &transaction.category,
            &transaction.gl_code,
            &transaction.bank_account,
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}
