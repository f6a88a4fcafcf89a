//! Per-counterparty view of the journal.

use serde::Serialize;

use crate::{PaymentStatus, Transaction, vat::round_cents};

/// Everything the journal knows about one counterparty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyLedger {
    /// The counterparty the ledger was built for.
    pub counterparty: String,
    /// Gross total of their settled rows.
    pub total_paid: f64,
    /// Gross total of their open rows. This is the balance owed figure:
    /// a counterparty is assumed to act as either customer or supplier
    /// within one report, so income and expense rows are not netted
    /// against each other.
    pub total_unpaid: f64,
    /// Their rows, oldest first.
    pub transactions: Vec<Transaction>,
}

/// Collect the rows naming `counterparty` and total them by status.
///
/// Names are compared exactly after trimming surrounding whitespace; the
/// journal stores counterparties as plain text, not as references to a
/// master list.
pub fn counterparty_ledger(transactions: &[Transaction], counterparty: &str) -> CounterpartyLedger {
    let wanted = counterparty.trim();

    let mut rows: Vec<Transaction> = transactions
        .iter()
        .filter(|transaction| transaction.counterparty.trim() == wanted)
        .cloned()
        .collect();

    rows.sort_by(|a, b| a.doc_date.cmp(&b.doc_date).then(a.id.cmp(&b.id)));

    let mut total_paid = 0.0;
    let mut total_unpaid = 0.0;

    for row in &rows {
        match row.status {
            PaymentStatus::Paid => total_paid += row.gross(),
            PaymentStatus::Unpaid => total_unpaid += row.gross(),
        }
    }

    CounterpartyLedger {
        counterparty: wanted.to_owned(),
        total_paid: round_cents(total_paid),
        total_unpaid: round_cents(total_unpaid),
        transactions: rows,
    }
}
