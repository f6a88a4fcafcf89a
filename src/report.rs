//! Formats report figures as plain text for the command line tools.
//!
//! Every money figure is rendered through [currency], which rounds to
//! two decimals and adds thousands separators.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::{
    Transaction,
    checks,
    ledger::{AGING_BUCKET_LABELS, AccountKind, AgingReport, MonthlyTotals, PeriodTotals, VatSummary},
};

/// Format a money amount as a euro string with two decimals.
pub fn currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("€")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-€")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    let mut formatted_string = if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "€0.00".to_owned()
    };

    // numfmt omits the last trailing zero, so we must add it ourselves
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}

/// The headline figures for a period, one per line.
pub fn render_overview(totals: &PeriodTotals, vat: &VatSummary, net_cash: f64) -> String {
    let vat_label = if vat.vat_payable >= 0.0 {
        "VAT payable"
    } else {
        "VAT refund due"
    };

    let mut out = String::new();
    let _ = writeln!(out, "Income (net):    {}", currency(totals.income_net));
    let _ = writeln!(out, "Expenses (net):  {}", currency(totals.expense_net));
    let _ = writeln!(out, "Profit/Loss:     {}", currency(totals.profit_net));
    let _ = writeln!(out, "Net cash:        {}", currency(net_cash));
    let _ = writeln!(out, "VAT collected:   {}", currency(vat.vat_collected));
    let _ = writeln!(out, "VAT deductible:  {}", currency(vat.vat_deductible));
    let _ = writeln!(out, "{:<17}{}", format!("{vat_label}:"), currency(vat.vat_payable.abs()));
    out
}

/// The month-by-month income and expense table.
pub fn render_monthly(breakdown: &[MonthlyTotals]) -> String {
    let mut out = String::new();

    for monthly in breakdown {
        let _ = writeln!(
            out,
            "{} {}   income {:>14}   expenses {:>14}",
            monthly.label(),
            monthly.month.year(),
            currency(monthly.income_net),
            currency(monthly.expense_net),
        );
    }

    out
}

/// Account balances grouped into cash and bank sections.
pub fn render_balances(balances: &HashMap<String, f64>) -> String {
    let mut cash_accounts = Vec::new();
    let mut bank_accounts = Vec::new();

    for (account, balance) in balances {
        match AccountKind::classify(account) {
            AccountKind::Cash => cash_accounts.push((account.clone(), *balance)),
            AccountKind::Bank => bank_accounts.push((account.clone(), *balance)),
        }
    }

    cash_accounts.sort_by(|a, b| a.0.cmp(&b.0));
    bank_accounts.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();

    for (heading, accounts) in [("Cash", cash_accounts), ("Bank", bank_accounts)] {
        if accounts.is_empty() {
            continue;
        }

        let _ = writeln!(out, "{heading}:");

        for (account, balance) in accounts {
            let label = if account.is_empty() {
                "(no account)"
            } else {
                account.as_str()
            };
            let _ = writeln!(out, "  {label:<24}{}", currency(balance));
        }
    }

    let total: f64 = balances.values().sum();
    let _ = writeln!(out, "  {:<24}{}", "Total", currency(total));

    out
}

/// Open receivables per counterparty and bucket, plus open payables.
pub fn render_aging(report: &AgingReport) -> String {
    let mut out = String::new();

    if report.receivables.is_empty() {
        let _ = writeln!(out, "No open receivables.");
    } else {
        let _ = writeln!(
            out,
            "{:<24}{:>14}{:>14}{:>14}{:>14}",
            "Receivables",
            AGING_BUCKET_LABELS[0],
            AGING_BUCKET_LABELS[1],
            AGING_BUCKET_LABELS[2],
            AGING_BUCKET_LABELS[3],
        );

        for entry in &report.receivables {
            let _ = writeln!(
                out,
                "{:<24}{:>14}{:>14}{:>14}{:>14}",
                entry.counterparty,
                currency(entry.buckets[0]),
                currency(entry.buckets[1]),
                currency(entry.buckets[2]),
                currency(entry.buckets[3]),
            );
        }
    }

    let _ = writeln!(out, "Open payables: {}", currency(report.payables_total));

    out
}

/// The rows the quality checks flagged, or a short all-clear note.
pub fn render_checks(transactions: &[Transaction]) -> String {
    let missing_dates = checks::paid_missing_payment_date(transactions);
    let mismatches = checks::gross_mismatches(transactions);

    if missing_dates.is_empty() && mismatches.is_empty() {
        return "All checks passed.\n".to_owned();
    }

    let mut out = String::new();

    if !missing_dates.is_empty() {
        let _ = writeln!(
            out,
            "{} paid row(s) have no payment date:",
            missing_dates.len()
        );
        for transaction in missing_dates {
            let _ = writeln!(out, "  {}", journal_line(transaction));
        }
    }

    if !mismatches.is_empty() {
        let _ = writeln!(
            out,
            "{} row(s) where gross does not equal net plus VAT:",
            mismatches.len()
        );
        for transaction in mismatches {
            let _ = writeln!(out, "  {}", journal_line(transaction));
        }
    }

    out
}

/// A one-line journal listing for search results and check output.
pub fn render_journal(transactions: &[Transaction]) -> String {
    let mut out = String::new();

    for transaction in transactions {
        let _ = writeln!(out, "{}", journal_line(transaction));
    }

    out
}

fn journal_line(transaction: &Transaction) -> String {
    format!(
        "{}  {:<18}{:<24}{:<32}{:>14}  {}",
        transaction.doc_date,
        transaction.doc_type.as_str(),
        transaction.counterparty,
        transaction.description,
        currency(transaction.gross()),
        transaction.status.as_str(),
    )
}


#[cfg(test)]
mod render_tests {
    use std::collections::HashMap;

    use time::macros::date;

    use crate::{
        DocType, PaymentStatus, Transaction,
        ledger::{aging, monthly_breakdown, period_totals, vat_summary},
    };

    use super::{render_aging, render_balances, render_checks, render_monthly, render_overview};

    #[test]
    fn overview_labels_a_refund_by_sign() {
        let transactions = vec![
            Transaction::build(DocType::Income, date!(2025 - 01 - 05), 100.0)
                .vat_amount(24.0)
                .finalise(1),
            Transaction::build(DocType::Bill, date!(2025 - 01 - 12), 500.0)
                .vat_amount(120.0)
                .finalise(2),
        ];

        let rendered = render_overview(
            &period_totals(&transactions),
            &vat_summary(&transactions),
            0.0,
        );

        assert!(rendered.contains("VAT refund due"), "got: {rendered}");
        assert!(rendered.contains("€96.00"), "got: {rendered}");
    }

    #[test]
    fn monthly_lines_carry_month_labels() {
        let transactions =
            vec![Transaction::build(DocType::Income, date!(2025 - 02 - 10), 150.0).finalise(1)];

        let rendered = render_monthly(&monthly_breakdown(&transactions));

        assert!(rendered.contains("Feb 2025"), "got: {rendered}");
        assert!(rendered.contains("€150.00"), "got: {rendered}");
    }

    #[test]
    fn balances_are_grouped_and_totalled() {
        let mut balances = HashMap::new();
        balances.insert("Ταμείο".to_owned(), 250.0);
        balances.insert("Alpha Business".to_owned(), 750.0);

        let rendered = render_balances(&balances);

        assert!(rendered.contains("Cash:"), "got: {rendered}");
        assert!(rendered.contains("Bank:"), "got: {rendered}");
        assert!(rendered.contains("€1,000.00"), "got: {rendered}");
    }

    #[test]
    fn aging_renders_payables_total() {
        let transactions = vec![
            Transaction::build(DocType::Bill, date!(2025 - 05 - 01), 400.0)
                .vat_amount(96.0)
                .counterparty("Supplies Co")
                .finalise(1),
        ];

        let rendered = render_aging(&aging(&transactions, date!(2025 - 06 - 30)));

        assert!(rendered.contains("No open receivables."), "got: {rendered}");
        assert!(rendered.contains("Open payables: €496.00"), "got: {rendered}");
    }

    #[test]
    fn clean_journal_passes_checks() {
        let transactions = vec![
            Transaction::build(DocType::Income, date!(2025 - 01 - 05), 100.0)
                .vat_amount(24.0)
                .status(PaymentStatus::Paid)
                .payment_date(Some(date!(2025 - 01 - 10)))
                .finalise(1),
        ];

        assert_eq!(render_checks(&transactions), "All checks passed.\n");
    }
}
