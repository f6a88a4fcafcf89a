//! Tolerant parsing of spreadsheet cells.
//!
//! Journals arrive from whatever the business was using before: amounts
//! with currency symbols and thousands separators, dates in three
//! different layouts, document types in English or Greek. Each parser
//! here returns `None` for a cell it cannot read; the import layer picks
//! the safe default.

use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{DocType, PaymentMethod, PaymentStatus};

/// Parse a money cell into a plain decimal.
///
/// Strips currency symbols and spacing, then resolves the separator
/// convention: when both `.` and `,` appear the rightmost one is the
/// decimal separator; a lone comma is read as a decimal comma; repeated
/// separators are thousands grouping.
pub fn parse_amount(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '£' | ' ' | '\u{a0}' | '\u{202f}'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let comma = cleaned.rfind(',');
    let dot = cleaned.rfind('.');

    let normalised = match (comma, dot) {
        // 1.234,56
        (Some(comma), Some(dot)) if comma > dot => {
            cleaned.replace('.', "").replace(',', ".")
        }
        // 1,234.56
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => {
            if cleaned.matches(',').count() == 1 {
                // 1234,56
                cleaned.replace(',', ".")
            } else {
                // 1,234,567
                cleaned.replace(',', "")
            }
        }
        (None, Some(_)) => {
            if cleaned.matches('.').count() == 1 {
                // 1234.56
                cleaned
            } else {
                // 1.234.567
                cleaned.replace('.', "")
            }
        }
        (None, None) => cleaned,
    };

    normalised.parse().ok()
}

/// Parse a date cell, accepting the layouts seen in real exports.
pub fn parse_date(cell: &str) -> Option<Date> {
    const ISO: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
    const SLASH_DMY: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");
    const DASH_DMY: &[BorrowedFormatItem] = format_description!("[day]-[month]-[year]");
    const SLASH_YMD: &[BorrowedFormatItem] = format_description!("[year]/[month]/[day]");

    let cell = cell.trim();

    [ISO, SLASH_DMY, DASH_DMY, SLASH_YMD]
        .into_iter()
        .find_map(|format| Date::parse(cell, format).ok())
}

/// Parse a document type cell, accepting the stored labels plus the
/// English and Greek spellings found in spreadsheets.
pub fn parse_doc_type(cell: &str) -> Option<DocType> {
    if let Some(doc_type) = DocType::from_label(cell.trim()) {
        return Some(doc_type);
    }

    match normalise(cell).as_str() {
        "income" | "sale" | "sales" | "revenue" | "έσοδα" | "εσοδα" | "πώληση"
        | "πωληση" => Some(DocType::Income),
        "expense" | "expenses" | "purchase" | "έξοδα" | "εξοδα" | "δαπάνη"
        | "δαπανη" => Some(DocType::Expense),
        "bill" | "τιμολόγιο" | "τιμολογιο" => Some(DocType::Bill),
        "equity distribution" | "dividend" | "διανομή κερδών" | "διανομη κερδων" => {
            Some(DocType::EquityDistribution)
        }
        "transfer" | "μεταφορά" | "μεταφορα" => Some(DocType::Transfer),
        "cash withdrawal" | "withdrawal" | "ανάληψη" | "αναληψη" => {
            Some(DocType::CashWithdrawal)
        }
        "cash deposit" | "deposit" | "κατάθεση" | "καταθεση" => Some(DocType::CashDeposit),
        "bank operation" | "bank charge" | "τραπεζική πράξη" | "τραπεζικη πραξη" => {
            Some(DocType::BankOperation)
        }
        _ => None,
    }
}

/// Parse a payment method cell.
pub fn parse_payment_method(cell: &str) -> Option<PaymentMethod> {
    if let Some(method) = PaymentMethod::from_label(cell.trim()) {
        return Some(method);
    }

    match normalise(cell).as_str() {
        "bank" | "bank transfer" | "τράπεζα" | "τραπεζα" | "έμβασμα" | "εμβασμα" => {
            Some(PaymentMethod::Bank)
        }
        "cash" | "μετρητά" | "μετρητα" => Some(PaymentMethod::Cash),
        "credit" | "on credit" | "πίστωση" | "πιστωση" | "επί πιστώσει"
        | "επι πιστωσει" => Some(PaymentMethod::Credit),
        _ => None,
    }
}

/// Parse a paid/unpaid flag cell.
pub fn parse_status(cell: &str) -> Option<PaymentStatus> {
    if let Some(status) = PaymentStatus::from_label(cell.trim()) {
        return Some(status);
    }

    match normalise(cell).as_str() {
        "paid" | "yes" | "πληρωμένο" | "πληρωμενο" | "εξοφλημένο" | "εξοφλημενο"
        | "ναι" => Some(PaymentStatus::Paid),
        "unpaid" | "open" | "no" | "ανεξόφλητο" | "ανεξοφλητο" | "όχι" | "οχι" => {
            Some(PaymentStatus::Unpaid)
        }
        _ => None,
    }
}

fn normalise(cell: &str) -> String {
    cell.trim().to_lowercase()
}
