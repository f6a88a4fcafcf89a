//! Month-by-month income and expense figures.

use std::collections::HashMap;

use serde::Serialize;
use time::Date;

use crate::{Transaction, vat::round_cents};

/// Net income and expenses for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyTotals {
    /// The month, keyed as its first day.
    pub month: Date,
    /// Sum of net amounts over the month's income documents.
    pub income_net: f64,
    /// Sum of net amounts over the month's expense and bill documents.
    pub expense_net: f64,
}

impl MonthlyTotals {
    /// Three-letter label for the month, e.g. "Jan".
    pub fn label(&self) -> &'static str {
        use time::Month;

        match self.month.month() {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

/// Aggregate income and expense net amounts per calendar month.
///
/// Only months that contain at least one income, expense, or bill
/// document appear; the result is sorted chronologically.
pub fn monthly_breakdown(transactions: &[Transaction]) -> Vec<MonthlyTotals> {
    let mut totals: HashMap<Date, (f64, f64)> = HashMap::new();

    for transaction in transactions {
        let month = transaction
            .doc_date
            .replace_day(1)
            .expect("every month has a first day");

        if transaction.doc_type.is_income() {
            totals.entry(month).or_insert((0.0, 0.0)).0 += transaction.amount_net;
        } else if transaction.doc_type.is_expense() {
            totals.entry(month).or_insert((0.0, 0.0)).1 += transaction.amount_net;
        }
    }

    let mut breakdown: Vec<MonthlyTotals> = totals
        .into_iter()
        .map(|(month, (income_net, expense_net))| MonthlyTotals {
            month,
            income_net: round_cents(income_net),
            expense_net: round_cents(expense_net),
        })
        .collect();

    breakdown.sort_by_key(|monthly| monthly.month);
    breakdown
}
