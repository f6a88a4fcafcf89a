//! Bulk import of journal rows from CSV exports.
//!
//! The reader maps whatever column names the source sheet used onto the
//! journal's fields, then converts rows one by one. A defective cell is
//! degraded to a safe default and counted; a single bad row never stops
//! the rest of the file.

use csv::ReaderBuilder;
use time::Date;

use crate::{DocType, Error, PaymentMethod, PaymentStatus, Transaction, TransactionBuilder};

use super::fields;

/// The journal fields a CSV column can map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    DocDate,
    DocNo,
    DocType,
    Counterparty,
    Description,
    Category,
    GlCode,
    AmountNet,
    VatAmount,
    AmountGross,
    PaymentMethod,
    BankAccount,
    Status,
    PaymentDate,
}

/// Map a header cell onto a journal field, tolerating the column names
/// seen in real exports (English and Greek).
fn match_header(header: &str) -> Option<Column> {
    match header.trim().to_lowercase().as_str() {
        "docdate" | "doc date" | "date" | "ημερομηνία" | "ημερομηνια" | "ημ/νία"
        | "ημ/νια" => Some(Column::DocDate),
        "docno" | "doc no" | "document no" | "doc number" | "reference"
        | "αρ. παραστατικού" | "αρ. παραστατικου" | "παραστατικό"
        | "παραστατικο" => Some(Column::DocNo),
        "doctype" | "doc type" | "type" | "είδος" | "ειδος" | "τύπος" | "τυπος" => {
            Some(Column::DocType)
        }
        "counterparty" | "customer" | "supplier" | "party" | "συναλλασσόμενος"
        | "συναλλασσομενος" | "πελάτης" | "πελατης" | "προμηθευτής"
        | "προμηθευτης" => Some(Column::Counterparty),
        "description" | "memo" | "περιγραφή" | "περιγραφη" => Some(Column::Description),
        "category" | "κατηγορία" | "κατηγορια" => Some(Column::Category),
        "gl code" | "glcode" | "gl" | "κωδικός λογιστικής"
        | "κωδικος λογιστικης" => Some(Column::GlCode),
        "amount (net)" | "amount net" | "net amount" | "net" | "καθαρό" | "καθαρο"
        | "καθαρή αξία" | "καθαρη αξια" => Some(Column::AmountNet),
        "vat amount" | "vat" | "φπα" => Some(Column::VatAmount),
        "amount (gross)" | "amount gross" | "gross amount" | "gross" | "μικτό"
        | "μικτο" => Some(Column::AmountGross),
        "payment method" | "method" | "τρόπος πληρωμής" | "τροπος πληρωμης" => {
            Some(Column::PaymentMethod)
        }
        "bank account" | "account" | "λογαριασμός" | "λογαριασμος" => {
            Some(Column::BankAccount)
        }
        "status" | "κατάσταση" | "κατασταση" => Some(Column::Status),
        "payment date" | "ημ. πληρωμής" | "ημ. πληρωμης"
        | "ημερομηνία πληρωμής" | "ημερομηνια πληρωμης" => {
            Some(Column::PaymentDate)
        }
        _ => None,
    }
}

/// What came out of reading a journal CSV.
#[derive(Debug)]
pub struct ImportOutcome {
    /// One builder per imported row, in file order.
    pub builders: Vec<TransactionBuilder>,
    /// How many cells could not be read and fell back to a default.
    pub degraded_cells: usize,
    /// How many rows were skipped outright (blank or unreadable).
    pub skipped_rows: usize,
}

/// Parse CSV `text` into transaction builders.
///
/// `today` is used as the fallback for unreadable date cells; passing it
/// in keeps the import deterministic for the caller.
///
/// # Errors
/// Returns [Error::InvalidCsv] only when the file as a whole is
/// unusable: no header row, or no header that maps onto a journal
/// field. Row-level defects degrade instead (see [ImportOutcome]).
pub fn parse_journal_csv(text: &str, today: Date) -> Result<ImportOutcome, Error> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(format!("could not read the header row: {error}")))?;

    let columns: Vec<Option<Column>> = headers.iter().map(match_header).collect();

    if columns.iter().all(Option::is_none) {
        return Err(Error::InvalidCsv(
            "no column in the header row maps onto a journal field".to_owned(),
        ));
    }

    let mut builders = Vec::new();
    let mut degraded_cells = 0;
    let mut skipped_rows = 0;

    for (row_number, record) in reader.records().enumerate() {
        // Header is line 1, first record is line 2.
        let line = row_number + 2;

        let record = match record {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!("skipping unreadable row on line {line}: {error}");
                skipped_rows += 1;
                continue;
            }
        };

        let cell = |wanted: Column| -> &str {
            columns
                .iter()
                .position(|column| *column == Some(wanted))
                .and_then(|index| record.get(index))
                .unwrap_or("")
        };

        if [
            Column::DocDate,
            Column::DocNo,
            Column::DocType,
            Column::Counterparty,
            Column::Description,
            Column::AmountNet,
            Column::VatAmount,
            Column::AmountGross,
            Column::Status,
        ]
        .into_iter()
        .all(|column| cell(column).is_empty())
        {
            skipped_rows += 1;
            continue;
        }

        let mut degrade = |what: &str, raw: &str| {
            tracing::warn!("line {line}: could not read {what} from '{raw}', using a default");
            degraded_cells += 1;
        };

        let doc_date = match cell(Column::DocDate) {
            "" => today,
            raw => fields::parse_date(raw).unwrap_or_else(|| {
                degrade("a date", raw);
                today
            }),
        };

        let doc_type = match cell(Column::DocType) {
            "" => DocType::BankOperation,
            raw => fields::parse_doc_type(raw).unwrap_or_else(|| {
                degrade("a document type", raw);
                DocType::BankOperation
            }),
        };

        let mut amount = |column: Column, what: &str| match cell(column) {
            "" => 0.0,
            raw => fields::parse_amount(raw).unwrap_or_else(|| {
                degrade(what, raw);
                0.0
            }),
        };

        let amount_net = amount(Column::AmountNet, "a net amount");
        let vat_amount = amount(Column::VatAmount, "a VAT amount");
        let amount_gross = amount(Column::AmountGross, "a gross amount");

        let payment_method = match cell(Column::PaymentMethod) {
            "" => PaymentMethod::Bank,
            raw => fields::parse_payment_method(raw).unwrap_or_else(|| {
                degrade("a payment method", raw);
                PaymentMethod::Bank
            }),
        };

        let status = match cell(Column::Status) {
            "" => PaymentStatus::Unpaid,
            raw => fields::parse_status(raw).unwrap_or_else(|| {
                degrade("a payment status", raw);
                PaymentStatus::Unpaid
            }),
        };

        let payment_date = match cell(Column::PaymentDate) {
            "" => None,
            raw => match fields::parse_date(raw) {
                Some(date) => Some(date),
                None => {
                    degrade("a payment date", raw);
                    None
                }
            },
        };

        let mut builder = Transaction::build(doc_type, doc_date, amount_net)
            .doc_no(cell(Column::DocNo))
            .counterparty(cell(Column::Counterparty))
            .description(cell(Column::Description))
            .category(cell(Column::Category))
            .gl_code(cell(Column::GlCode))
            .vat_amount(vat_amount)
            .payment_method(payment_method)
            .bank_account(cell(Column::BankAccount))
            .status(status)
            .payment_date(payment_date);

        // A stated gross wins over the computed one; a blank or zero
        // gross is left to the net-plus-VAT figure the builder already
        // carries.
        if amount_gross != 0.0 {
            builder = builder.amount_gross(amount_gross);
        }

        builders.push(builder);
    }

    Ok(ImportOutcome {
        builders,
        degraded_cells,
        skipped_rows,
    })
}

#[cfg(test)]
mod parse_journal_csv_tests {
    use time::macros::date;

    use crate::{DocType, Error, PaymentMethod, PaymentStatus};

    use super::parse_journal_csv;

    const TODAY: time::Date = date!(2025 - 07 - 01);

    #[test]
    fn maps_english_headers() {
        let text = "\
DocDate,DocNo,DocType,Counterparty,Description,Amount (Net),VAT Amount,Amount (Gross),Payment Method,Bank Account,Status
2025-03-14,INV-042,Income,Meltemi Cafe,March catering,1000.00,240.00,1240.00,Bank,Alpha Business,Paid";

        let outcome = parse_journal_csv(text, TODAY).expect("Could not parse CSV");

        assert_eq!(outcome.builders.len(), 1);
        assert_eq!(outcome.degraded_cells, 0);
        assert_eq!(outcome.skipped_rows, 0);

        let builder = &outcome.builders[0];
        assert_eq!(builder.doc_date, date!(2025 - 03 - 14));
        assert_eq!(builder.doc_no, "INV-042");
        assert_eq!(builder.doc_type, DocType::Income);
        assert_eq!(builder.counterparty, "Meltemi Cafe");
        assert_eq!(builder.amount_net, 1000.0);
        assert_eq!(builder.vat_amount, 240.0);
        assert_eq!(builder.amount_gross, 1240.0);
        assert_eq!(builder.payment_method, PaymentMethod::Bank);
        assert_eq!(builder.bank_account, "Alpha Business");
        assert_eq!(builder.status, PaymentStatus::Paid);
    }

    #[test]
    fn maps_greek_headers_and_labels() {
        let text = "\
Ημερομηνία,Είδος,Συναλλασσόμενος,Περιγραφή,Καθαρό,ΦΠΑ,Μικτό,Τρόπος Πληρωμής,Λογαριασμός,Κατάσταση
14/03/2025,Έσοδα,Καφέ Μελτέμι,Τροφοδοσία Μαρτίου,\"1.000,00\",\"240,00\",\"1.240,00\",Μετρητά,Ταμείο,Πληρωμένο";

        let outcome = parse_journal_csv(text, TODAY).expect("Could not parse CSV");

        assert_eq!(outcome.builders.len(), 1);
        assert_eq!(outcome.degraded_cells, 0);

        let builder = &outcome.builders[0];
        assert_eq!(builder.doc_date, date!(2025 - 03 - 14));
        assert_eq!(builder.doc_type, DocType::Income);
        assert_eq!(builder.amount_net, 1000.0);
        assert_eq!(builder.vat_amount, 240.0);
        assert_eq!(builder.amount_gross, 1240.0);
        assert_eq!(builder.payment_method, PaymentMethod::Cash);
        assert_eq!(builder.status, PaymentStatus::Paid);
    }

    #[test]
    fn bad_cells_degrade_without_losing_the_row() {
        let text = "\
Date,Type,Counterparty,Description,Net,VAT,Gross,Status
not a date,mystery,Acme,Broken row,abc,,,maybe
2025-05-01,Expense,Office Mart,Fine row,80.00,19.20,99.20,Paid";

        let outcome = parse_journal_csv(text, TODAY).expect("Could not parse CSV");

        assert_eq!(outcome.builders.len(), 2);
        // date, doc type, net amount, and status all fell back
        assert_eq!(outcome.degraded_cells, 4);

        let degraded = &outcome.builders[0];
        assert_eq!(degraded.doc_date, TODAY);
        assert_eq!(degraded.doc_type, DocType::BankOperation);
        assert_eq!(degraded.amount_net, 0.0);
        assert_eq!(degraded.status, PaymentStatus::Unpaid);

        assert_eq!(outcome.builders[1].amount_net, 80.0);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let text = "\
Date,Type,Net
2025-05-01,Income,100.00
,,
2025-05-02,Income,50.00";

        let outcome = parse_journal_csv(text, TODAY).expect("Could not parse CSV");

        assert_eq!(outcome.builders.len(), 2);
        assert_eq!(outcome.skipped_rows, 1);
    }

    #[test]
    fn blank_gross_falls_back_to_net_plus_vat() {
        let text = "\
Date,Type,Net,VAT,Gross
2025-05-01,Income,100.00,24.00,";

        let outcome = parse_journal_csv(text, TODAY).expect("Could not parse CSV");

        assert_eq!(outcome.builders[0].amount_gross, 124.0);
    }

    #[test]
    fn unrecognised_headers_fail_the_file() {
        let text = "\
Foo,Bar,Baz
1,2,3";

        let result = parse_journal_csv(text, TODAY);

        assert!(matches!(result, Err(Error::InvalidCsv(_))));
    }
}
