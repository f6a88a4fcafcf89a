//! Period profit-and-loss and VAT figures.

use serde::Serialize;

use crate::{Transaction, vat::round_cents};

/// Net income, net expenses, and the profit for a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodTotals {
    /// Sum of net amounts over income documents.
    pub income_net: f64,
    /// Sum of net amounts over expense and bill documents.
    pub expense_net: f64,
    /// Income minus expenses; negative for a loss.
    pub profit_net: f64,
}

/// The VAT position for a period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VatSummary {
    /// VAT charged on sales.
    pub vat_collected: f64,
    /// VAT paid on purchases and bills.
    pub vat_deductible: f64,
    /// Collected minus deductible. Positive means owed to the tax
    /// authority, negative means a refund is due; callers label the
    /// figure by its sign.
    pub vat_payable: f64,
}

/// Compute the profit-and-loss figures for a set of transactions.
///
/// An empty input yields an all-zero result.
pub fn period_totals(transactions: &[Transaction]) -> PeriodTotals {
    let mut income_net = 0.0;
    let mut expense_net = 0.0;

    for transaction in transactions {
        if transaction.doc_type.is_income() {
            income_net += transaction.amount_net;
        } else if transaction.doc_type.is_expense() {
            expense_net += transaction.amount_net;
        }
    }

    PeriodTotals {
        income_net: round_cents(income_net),
        expense_net: round_cents(expense_net),
        profit_net: round_cents(income_net - expense_net),
    }
}

/// Compute the VAT position for a set of transactions.
///
/// An empty input yields an all-zero result.
pub fn vat_summary(transactions: &[Transaction]) -> VatSummary {
    let mut vat_collected = 0.0;
    let mut vat_deductible = 0.0;

    for transaction in transactions {
        if transaction.doc_type.is_income() {
            vat_collected += transaction.vat_amount;
        } else if transaction.doc_type.is_expense() {
            vat_deductible += transaction.vat_amount;
        }
    }

    VatSummary {
        vat_collected: round_cents(vat_collected),
        vat_deductible: round_cents(vat_deductible),
        vat_payable: round_cents(vat_collected - vat_deductible),
    }
}
