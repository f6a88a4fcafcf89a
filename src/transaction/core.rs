//! Defines the core journal record and its validation rules.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

/// The ID of a transaction in the journal.
pub type TransactionId = i64;

/// Tolerance used when checking that a gross amount equals net plus VAT.
///
/// Journals imported from spreadsheets carry rounding noise of up to one
/// cent per row; anything beyond that is treated as a data entry mistake.
pub const AMOUNT_EPSILON: f64 = 0.01;

/// The kind of financial event a journal row records.
///
/// The document type drives the sign conventions in the reports: income is
/// an inflow, everything else that has been paid is an outflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    /// A sale or other revenue document.
    Income,
    /// A direct expense (receipt-level purchase).
    Expense,
    /// A supplier invoice to be settled later.
    Bill,
    /// A distribution of profit to the owners.
    EquityDistribution,
    /// A movement of money out of one tracked account.
    Transfer,
    /// Cash taken out of a bank account.
    CashWithdrawal,
    /// Cash deposited into a bank account.
    CashDeposit,
    /// A bank charge, interest line, or other bank-side movement.
    BankOperation,
}

impl DocType {
    /// The label stored in the database and used in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            DocType::Income => "Income",
            DocType::Expense => "Expense",
            DocType::Bill => "Bill",
            DocType::EquityDistribution => "EquityDistribution",
            DocType::Transfer => "Transfer",
            DocType::CashWithdrawal => "CashWithdrawal",
            DocType::CashDeposit => "CashDeposit",
            DocType::BankOperation => "BankOperation",
        }
    }

    /// Parse the exact stored label. Localized spreadsheet labels are
    /// handled at the import boundary, not here.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Income" => Some(DocType::Income),
            "Expense" => Some(DocType::Expense),
            "Bill" => Some(DocType::Bill),
            "EquityDistribution" => Some(DocType::EquityDistribution),
            "Transfer" => Some(DocType::Transfer),
            "CashWithdrawal" => Some(DocType::CashWithdrawal),
            "CashDeposit" => Some(DocType::CashDeposit),
            "BankOperation" => Some(DocType::BankOperation),
            _ => None,
        }
    }

    /// Whether this document counts as revenue in the profit and VAT reports.
    pub fn is_income(self) -> bool {
        matches!(self, DocType::Income)
    }

    /// Whether this document counts as an expense in the profit and VAT
    /// reports. Direct expenses and supplier bills both qualify.
    pub fn is_expense(self) -> bool {
        matches!(self, DocType::Expense | DocType::Bill)
    }
}

/// How a transaction was (or will be) settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Settled through a bank account.
    Bank,
    /// Settled in cash.
    Cash,
    /// On credit; no account is touched until the row is paid.
    Credit,
}

impl PaymentMethod {
    /// The label stored in the database and used in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Bank => "Bank",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Credit => "Credit",
        }
    }

    /// Parse the exact stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Bank" => Some(PaymentMethod::Bank),
            "Cash" => Some(PaymentMethod::Cash),
            "Credit" => Some(PaymentMethod::Credit),
            _ => None,
        }
    }
}

/// Whether a transaction has been settled.
///
/// Only paid rows participate in the cash balances; only unpaid rows
/// participate in aging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// The money has moved.
    Paid,
    /// The row is still open.
    Unpaid,
}

impl PaymentStatus {
    /// The label stored in the database and used in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Unpaid => "Unpaid",
        }
    }

    /// Parse the exact stored label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Paid" => Some(PaymentStatus::Paid),
            "Unpaid" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }
}

macro_rules! impl_label_sql {
    ($type:ty) => {
        impl ToSql for $type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(self.as_str().into())
            }
        }

        impl FromSql for $type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let label = value.as_str()?;
                Self::from_label(label).ok_or_else(|| {
                    FromSqlError::Other(
                        format!("'{label}' is not a known {}", stringify!($type)).into(),
                    )
                })
            }
        }
    };
}

impl_label_sql!(DocType);
impl_label_sql!(PaymentMethod);
impl_label_sql!(PaymentStatus);

/// One financial event in the journal: a sale, a purchase, a bill, a cash
/// movement, or an equity distribution.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the store on creation.
    pub id: TransactionId,
    /// The calendar date the document is dated.
    pub doc_date: Date,
    /// External reference such as an invoice or receipt number. Not
    /// unique; may be empty.
    pub doc_no: String,
    /// The kind of financial event this row records.
    pub doc_type: DocType,
    /// The customer or supplier on the other side; may be empty.
    pub counterparty: String,
    /// A free-text memo.
    pub description: String,
    /// Free-text classification used for grouping in reports.
    pub category: String,
    /// General ledger code, if the business keeps one.
    pub gl_code: String,
    /// The pre-tax amount. Never negative.
    pub amount_net: f64,
    /// The tax portion. Never negative.
    pub vat_amount: f64,
    /// The cash-settled amount, net plus VAT. Read it through
    /// [Transaction::gross], which repairs rows persisted with a zero
    /// gross.
    pub amount_gross: f64,
    /// How the transaction was or will be settled.
    pub payment_method: PaymentMethod,
    /// The name of the cash or bank account affected. Empty only for
    /// credit rows.
    pub bank_account: String,
    /// Whether the money has moved yet.
    pub status: PaymentStatus,
    /// When the row was settled, if known.
    pub payment_date: Option<Date>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(doc_type: DocType, doc_date: Date, amount_net: f64) -> TransactionBuilder {
        TransactionBuilder {
            doc_date,
            doc_no: String::new(),
            doc_type,
            counterparty: String::new(),
            description: String::new(),
            category: String::new(),
            gl_code: String::new(),
            amount_net,
            vat_amount: 0.0,
            amount_gross: amount_net,
            payment_method: PaymentMethod::Bank,
            bank_account: String::new(),
            status: PaymentStatus::Unpaid,
            payment_date: None,
        }
    }

    /// The cash-settled amount of this row.
    ///
    /// Spreadsheet-era journals contain rows where the gross column was
    /// never filled in. Such a row is repaired here by recomputing gross
    /// as net plus VAT, so every report sees the same figure regardless
    /// of how the row was persisted.
    pub fn gross(&self) -> f64 {
        if self.amount_gross == 0.0 && (self.amount_net != 0.0 || self.vat_amount != 0.0) {
            self.amount_net + self.vat_amount
        } else {
            self.amount_gross
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Only the document type, date, and net amount are required; every other
/// field has a sensible default. Chain the setters, then either hand the
/// builder to a store (which assigns the ID), or call
/// [TransactionBuilder::validated] first when the values came from manual
/// entry.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The calendar date the document is dated.
    pub doc_date: Date,
    /// External reference such as an invoice or receipt number.
    pub doc_no: String,
    /// The kind of financial event this row records.
    pub doc_type: DocType,
    /// The customer or supplier on the other side.
    pub counterparty: String,
    /// A free-text memo.
    pub description: String,
    /// Free-text classification used for grouping in reports.
    pub category: String,
    /// General ledger code, if the business keeps one.
    pub gl_code: String,
    /// The pre-tax amount.
    pub amount_net: f64,
    /// The tax portion.
    pub vat_amount: f64,
    /// The cash-settled amount. Defaults to the net amount until
    /// [TransactionBuilder::vat_amount] is set.
    pub amount_gross: f64,
    /// How the transaction was or will be settled.
    pub payment_method: PaymentMethod,
    /// The name of the cash or bank account affected.
    pub bank_account: String,
    /// Whether the money has moved yet.
    pub status: PaymentStatus,
    /// When the row was settled, if known.
    pub payment_date: Option<Date>,
}

impl TransactionBuilder {
    /// Set the external document reference.
    pub fn doc_no(mut self, doc_no: &str) -> Self {
        self.doc_no = doc_no.to_owned();
        self
    }

    /// Set the counterparty name.
    pub fn counterparty(mut self, counterparty: &str) -> Self {
        self.counterparty = counterparty.to_owned();
        self
    }

    /// Set the memo text.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the report grouping category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set the general ledger code.
    pub fn gl_code(mut self, gl_code: &str) -> Self {
        self.gl_code = gl_code.to_owned();
        self
    }

    /// Set the VAT amount and recompute the gross amount as net plus VAT.
    pub fn vat_amount(mut self, vat_amount: f64) -> Self {
        self.vat_amount = vat_amount;
        self.amount_gross = self.amount_net + vat_amount;
        self
    }

    /// Override the gross amount.
    ///
    /// Use this when the source document states its own gross figure;
    /// [TransactionBuilder::validated] checks the triple adds up.
    pub fn amount_gross(mut self, amount_gross: f64) -> Self {
        self.amount_gross = amount_gross;
        self
    }

    /// Set the payment method.
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    /// Set the affected account name.
    pub fn bank_account(mut self, bank_account: &str) -> Self {
        self.bank_account = bank_account.to_owned();
        self
    }

    /// Set the payment status.
    pub fn status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the settlement date.
    pub fn payment_date(mut self, payment_date: Option<Date>) -> Self {
        self.payment_date = payment_date;
        self
    }

    /// Check the builder against the manual-entry rules.
    ///
    /// Bulk imports skip this gate (a half-filled spreadsheet row is
    /// degraded, not rejected); anything a person typed in must pass it
    /// before the record is handed to a store.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NegativeAmount] if the net or VAT amount is negative,
    /// - [Error::AmountMismatch] if gross differs from net plus VAT by
    ///   more than [AMOUNT_EPSILON],
    /// - [Error::MissingCounterparty] or [Error::MissingDescription] if
    ///   either field is blank,
    /// - [Error::MissingBankAccount] if no account is named and the
    ///   payment method is not credit.
    pub fn validated(mut self) -> Result<Self, Error> {
        if self.amount_net < 0.0 {
            return Err(Error::NegativeAmount(self.amount_net));
        }

        if self.vat_amount < 0.0 {
            return Err(Error::NegativeAmount(self.vat_amount));
        }

        // A blank gross column means "not filled in", not "zero money".
        if self.amount_gross == 0.0 && (self.amount_net != 0.0 || self.vat_amount != 0.0) {
            self.amount_gross = self.amount_net + self.vat_amount;
        }

        if (self.amount_gross - (self.amount_net + self.vat_amount)).abs() > AMOUNT_EPSILON {
            return Err(Error::AmountMismatch {
                net: self.amount_net,
                vat: self.vat_amount,
                gross: self.amount_gross,
            });
        }

        if self.counterparty.trim().is_empty() {
            return Err(Error::MissingCounterparty);
        }

        if self.description.trim().is_empty() {
            return Err(Error::MissingDescription);
        }

        if self.bank_account.trim().is_empty() && self.payment_method != PaymentMethod::Credit {
            return Err(Error::MissingBankAccount);
        }

        Ok(self)
    }

    /// Build the transaction with the `id` assigned by a store.
    pub fn finalise(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            doc_date: self.doc_date,
            doc_no: self.doc_no,
            doc_type: self.doc_type,
            counterparty: self.counterparty,
            description: self.description,
            category: self.category,
            gl_code: self.gl_code,
            amount_net: self.amount_net,
            vat_amount: self.vat_amount,
            amount_gross: self.amount_gross,
            payment_method: self.payment_method,
            bank_account: self.bank_account,
            status: self.status,
            payment_date: self.payment_date,
        }
    }
}


#[cfg(test)]
mod gross_tests {
    use time::macros::date;

    use super::{DocType, Transaction};

    #[test]
    fn gross_repairs_zero_gross_rows() {
        let mut transaction = Transaction::build(DocType::Expense, date!(2025 - 01 - 10), 100.0)
            .vat_amount(24.0)
            .finalise(1);
        transaction.amount_gross = 0.0;

        assert_eq!(transaction.gross(), 124.0);
    }

    #[test]
    fn gross_passes_through_stored_amount() {
        let transaction = Transaction::build(DocType::Expense, date!(2025 - 01 - 10), 100.0)
            .vat_amount(24.0)
            .finalise(1);

        assert_eq!(transaction.gross(), 124.0);
    }

    #[test]
    fn gross_is_zero_for_all_zero_rows() {
        let transaction = Transaction::build(DocType::BankOperation, date!(2025 - 01 - 10), 0.0)
            .finalise(1);

        assert_eq!(transaction.gross(), 0.0);
    }
}
