//! Aging of unpaid receivables and payables.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{PaymentStatus, Transaction, vat::round_cents};

/// Display labels for the four aging buckets, oldest last.
pub const AGING_BUCKET_LABELS: [&str; 4] = ["0-29 days", "30-59 days", "60-89 days", "90+ days"];

/// Unpaid receivables bucketed by age, plus the open payables total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingReport {
    /// Open income documents grouped per counterparty, gross amounts per
    /// bucket. Sorted by counterparty name.
    pub receivables: Vec<CounterpartyAging>,
    /// Gross total of open expense and bill documents.
    pub payables_total: f64,
}

/// The open receivables of one counterparty, split by age bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyAging {
    /// The customer the money is owed by.
    pub counterparty: String,
    /// Gross amounts per bucket, in the order of [AGING_BUCKET_LABELS].
    pub buckets: [f64; 4],
}

impl CounterpartyAging {
    /// The counterparty's total open amount across all buckets.
    pub fn total(&self) -> f64 {
        round_cents(self.buckets.iter().sum())
    }
}

/// Classify unpaid items by how long they have been outstanding as of
/// `as_of`.
///
/// Only unpaid rows participate. Receivables are income documents,
/// bucketed by days open into `[0,30)`, `[30,60)`, `[60,90)`, and 90
/// days or more, with the lower bound inclusive; a post-dated invoice
/// (document date after `as_of`) counts as current. Payables are
/// expense and bill documents, reported as one flat total.
pub fn aging(transactions: &[Transaction], as_of: Date) -> AgingReport {
    let mut per_counterparty: HashMap<String, [f64; 4]> = HashMap::new();
    let mut payables_total = 0.0;

    for transaction in transactions {
        if transaction.status != PaymentStatus::Unpaid {
            continue;
        }

        if transaction.doc_type.is_income() {
            let days_open = (as_of - transaction.doc_date).whole_days();
            let buckets = per_counterparty
                .entry(transaction.counterparty.clone())
                .or_default();

            buckets[bucket_index(days_open)] += transaction.gross();
        } else if transaction.doc_type.is_expense() {
            payables_total += transaction.gross();
        }
    }

    let mut receivables: Vec<CounterpartyAging> = per_counterparty
        .into_iter()
        .map(|(counterparty, buckets)| CounterpartyAging {
            counterparty,
            buckets: buckets.map(round_cents),
        })
        .collect();

    receivables.sort_by(|a, b| a.counterparty.cmp(&b.counterparty));

    AgingReport {
        receivables,
        payables_total: round_cents(payables_total),
    }
}

fn bucket_index(days_open: i64) -> usize {
    match days_open {
        i64::MIN..30 => 0,
        30..60 => 1,
        60..90 => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod aging_tests {
    use time::{Duration, macros::date};

    use crate::{DocType, PaymentStatus, Transaction};

    use super::aging;

    const AS_OF: time::Date = date!(2025 - 06 - 30);

    fn open_invoice(days_before: i64, gross: f64, counterparty: &str) -> Transaction {
        Transaction::build(
            DocType::Income,
            AS_OF - Duration::days(days_before),
            gross,
        )
        .counterparty(counterparty)
        .finalise(0)
    }

    #[test]
    fn bucket_lower_bounds_are_inclusive() {
        let transactions = vec![
            open_invoice(29, 10.0, "Acme"),
            open_invoice(30, 20.0, "Acme"),
            open_invoice(59, 30.0, "Acme"),
            open_invoice(60, 40.0, "Acme"),
            open_invoice(89, 50.0, "Acme"),
            open_invoice(90, 60.0, "Acme"),
        ];

        let report = aging(&transactions, AS_OF);

        assert_eq!(report.receivables.len(), 1);
        assert_eq!(report.receivables[0].buckets, [10.0, 50.0, 90.0, 60.0]);
    }

    #[test]
    fn invoice_dated_exactly_thirty_days_ago_is_not_current() {
        let transactions = vec![open_invoice(30, 100.0, "Acme")];

        let report = aging(&transactions, AS_OF);

        assert_eq!(report.receivables[0].buckets[0], 0.0);
        assert_eq!(report.receivables[0].buckets[1], 100.0);
    }

    #[test]
    fn post_dated_invoices_count_as_current() {
        let transactions = vec![open_invoice(-14, 75.0, "Acme")];

        let report = aging(&transactions, AS_OF);

        assert_eq!(report.receivables[0].buckets, [75.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn receivables_group_by_counterparty_sorted_by_name() {
        let transactions = vec![
            open_invoice(5, 100.0, "Zenith"),
            open_invoice(10, 200.0, "Acme"),
            open_invoice(45, 300.0, "Acme"),
        ];

        let report = aging(&transactions, AS_OF);

        assert_eq!(report.receivables.len(), 2);
        assert_eq!(report.receivables[0].counterparty, "Acme");
        assert_eq!(report.receivables[0].buckets, [200.0, 300.0, 0.0, 0.0]);
        assert_eq!(report.receivables[0].total(), 500.0);
        assert_eq!(report.receivables[1].counterparty, "Zenith");
    }

    #[test]
    fn paid_rows_and_cash_movements_are_ignored() {
        let mut settled = open_invoice(45, 100.0, "Acme");
        settled.status = PaymentStatus::Paid;

        let transactions = vec![
            settled,
            Transaction::build(DocType::Transfer, date!(2025 - 05 - 01), 999.0).finalise(2),
        ];

        let report = aging(&transactions, AS_OF);

        assert!(report.receivables.is_empty());
        assert_eq!(report.payables_total, 0.0);
    }

    #[test]
    fn payables_are_a_flat_total() {
        let transactions = vec![
            Transaction::build(DocType::Bill, date!(2025 - 02 - 01), 400.0)
                .vat_amount(96.0)
                .counterparty("Supplies Co")
                .finalise(1),
            Transaction::build(DocType::Expense, date!(2025 - 06 - 20), 50.0)
                .counterparty("Office Mart")
                .finalise(2),
        ];

        let report = aging(&transactions, AS_OF);

        assert_eq!(report.payables_total, 546.0);
    }
}
