//! Data-quality checks over the journal.
//!
//! These surface the rows a bookkeeper needs to go back and fix; nothing
//! here mutates the journal.

use crate::{PaymentStatus, Transaction, vat};

/// Rows marked paid that carry no payment date.
///
/// A settled row without a settlement date usually means the status was
/// flipped in the grid without filling in the date column.
pub fn paid_missing_payment_date(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|transaction| {
            transaction.status == PaymentStatus::Paid && transaction.payment_date.is_none()
        })
        .collect()
}

/// Rows whose stored net/VAT/gross triple does not add up.
///
/// The reports repair a blank gross on the fly, but the stored row is
/// still wrong and should be corrected at the source.
pub fn gross_mismatches(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|transaction| {
            !vat::validate(
                transaction.amount_net,
                transaction.vat_amount,
                transaction.amount_gross,
            )
        })
        .collect()
}

#[cfg(test)]
mod checks_tests {
    use time::macros::date;

    use crate::{DocType, PaymentStatus, Transaction};

    use super::{gross_mismatches, paid_missing_payment_date};

    #[test]
    fn flags_paid_rows_without_a_payment_date() {
        let transactions = vec![
            Transaction::build(DocType::Income, date!(2025 - 01 - 05), 100.0)
                .status(PaymentStatus::Paid)
                .finalise(1),
            Transaction::build(DocType::Income, date!(2025 - 01 - 06), 100.0)
                .status(PaymentStatus::Paid)
                .payment_date(Some(date!(2025 - 01 - 20)))
                .finalise(2),
            Transaction::build(DocType::Income, date!(2025 - 01 - 07), 100.0).finalise(3),
        ];

        let flagged = paid_missing_payment_date(&transactions);

        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id, 1);
    }

    #[test]
    fn flags_rows_whose_amounts_do_not_add_up() {
        let mut blank_gross = Transaction::build(DocType::Expense, date!(2025 - 01 - 05), 100.0)
            .vat_amount(24.0)
            .finalise(1);
        blank_gross.amount_gross = 0.0;

        let mut wrong_gross = Transaction::build(DocType::Expense, date!(2025 - 01 - 06), 100.0)
            .vat_amount(24.0)
            .finalise(2);
        wrong_gross.amount_gross = 120.0;

        let fine = Transaction::build(DocType::Expense, date!(2025 - 01 - 07), 100.0)
            .vat_amount(24.0)
            .finalise(3);

        let flagged = gross_mismatches(&[blank_gross, wrong_gross, fine]);

        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0].id, 1);
        assert_eq!(flagged[1].id, 2);
    }

    #[test]
    fn clean_journal_raises_nothing() {
        let transactions = vec![
            Transaction::build(DocType::Income, date!(2025 - 01 - 05), 100.0)
                .vat_amount(24.0)
                .status(PaymentStatus::Paid)
                .payment_date(Some(date!(2025 - 01 - 10)))
                .finalise(1),
        ];

        assert!(paid_missing_payment_date(&transactions).is_empty());
        assert!(gross_mismatches(&transactions).is_empty());
    }
}
