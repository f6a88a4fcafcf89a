//! Cash and bank balances derived from paid transactions.

use std::collections::HashMap;

use serde::Serialize;

use crate::{PaymentStatus, Transaction, vat::round_cents};

/// Display grouping for an account, derived from its name.
///
/// Purely cosmetic: the balance arithmetic is identical for both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccountKind {
    /// A physical till or cash box.
    Cash,
    /// A bank account or card.
    Bank,
}

impl AccountKind {
    /// Classify an account by a case-insensitive match on the words small
    /// businesses actually put in account names ("cash", "ταμείο").
    pub fn classify(account_name: &str) -> Self {
        let name = account_name.to_lowercase();

        if name.contains("cash") || name.contains("ταμείο") || name.contains("ταμειο") {
            AccountKind::Cash
        } else {
            AccountKind::Bank
        }
    }
}

/// The balance of every account named by a paid transaction.
///
/// Income flows in at its gross amount; every other paid document flows
/// out at its gross amount. Unpaid rows touch nothing. Accounts appear
/// exactly as named, including the empty name when a paid row carries no
/// account.
pub fn cash_balances(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut balances: HashMap<String, f64> = HashMap::new();

    for transaction in transactions {
        if transaction.status != PaymentStatus::Paid {
            continue;
        }

        let flow = if transaction.doc_type.is_income() {
            transaction.gross()
        } else {
            -transaction.gross()
        };

        *balances
            .entry(transaction.bank_account.clone())
            .or_insert(0.0) += flow;
    }

    for balance in balances.values_mut() {
        *balance = round_cents(*balance);
    }

    balances
}

#[cfg(test)]
mod cash_balances_tests {
    use time::macros::date;

    use crate::{DocType, PaymentStatus, Transaction};

    use super::cash_balances;

    fn paid(doc_type: DocType, gross: f64, account: &str) -> Transaction {
        Transaction::build(doc_type, date!(2025 - 04 - 01), gross)
            .bank_account(account)
            .status(PaymentStatus::Paid)
            .finalise(0)
    }

    #[test]
    fn income_flows_in_everything_else_flows_out() {
        let transactions = vec![
            paid(DocType::Income, 1240.0, "Bank A"),
            paid(DocType::Expense, 496.0, "Bank A"),
        ];

        let balances = cash_balances(&transactions);

        assert_eq!(balances.len(), 1);
        assert_eq!(balances["Bank A"], 744.0);
    }

    #[test]
    fn unpaid_rows_do_not_move_money() {
        let transactions = vec![
            paid(DocType::Income, 500.0, "Till"),
            Transaction::build(DocType::Income, date!(2025 - 04 - 02), 900.0)
                .bank_account("Till")
                .finalise(2),
        ];

        let balances = cash_balances(&transactions);

        assert_eq!(balances["Till"], 500.0);
    }

    #[test]
    fn every_non_income_type_is_an_outflow() {
        let outflows = [
            DocType::Expense,
            DocType::Bill,
            DocType::EquityDistribution,
            DocType::Transfer,
            DocType::CashWithdrawal,
            DocType::CashDeposit,
            DocType::BankOperation,
        ];

        let mut transactions = vec![paid(DocType::Income, 1000.0, "Bank A")];
        transactions.extend(outflows.map(|doc_type| paid(doc_type, 100.0, "Bank A")));

        let balances = cash_balances(&transactions);

        assert_eq!(balances["Bank A"], 300.0);
    }

    #[test]
    fn balances_sum_to_net_paid_flow() {
        // Total across accounts must equal paid income gross minus paid
        // outflow gross, whichever accounts the rows are spread over.
        let transactions = vec![
            paid(DocType::Income, 1240.0, "Bank A"),
            paid(DocType::Income, 620.0, "Till"),
            paid(DocType::Expense, 496.0, "Bank A"),
            paid(DocType::Bill, 124.0, "Bank B"),
            paid(DocType::CashWithdrawal, 200.0, "Bank A"),
        ];

        let income_gross = 1240.0 + 620.0;
        let outflow_gross = 496.0 + 124.0 + 200.0;

        let total: f64 = cash_balances(&transactions).values().sum();

        assert_eq!(total, income_gross - outflow_gross);
    }

    #[test]
    fn zero_gross_rows_are_repaired_before_summing() {
        let mut broken = Transaction::build(DocType::Income, date!(2025 - 04 - 01), 100.0)
            .vat_amount(24.0)
            .bank_account("Bank A")
            .status(PaymentStatus::Paid)
            .finalise(1);
        broken.amount_gross = 0.0;

        let repaired = Transaction::build(DocType::Income, date!(2025 - 04 - 01), 100.0)
            .vat_amount(24.0)
            .bank_account("Bank A")
            .status(PaymentStatus::Paid)
            .finalise(2);

        let from_broken = cash_balances(&[broken]);
        let from_repaired = cash_balances(&[repaired]);

        assert_eq!(from_broken["Bank A"], 124.0);
        assert_eq!(from_broken, from_repaired);
    }
}
