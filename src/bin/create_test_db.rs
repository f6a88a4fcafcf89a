use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use defteri::{
    DocType, PaymentMethod, PaymentStatus, Transaction, initialize_db,
    stores::{SqliteTransactionStore, TransactionStore},
};

/// A utility for creating a demo journal database for defteri.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_journal.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_journal.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Writing the demo journal...");

    let mut store = SqliteTransactionStore::new(Arc::new(Mutex::new(connection)));

    let demo_journal = vec![
        Transaction::build(DocType::Income, date!(2025 - 05 - 02), 1000.0)
            .doc_no("INV-101")
            .counterparty("Meltemi Cafe")
            .description("May catering")
            .category("Catering")
            .vat_amount(240.0)
            .bank_account("Alpha Business")
            .status(PaymentStatus::Paid)
            .payment_date(Some(date!(2025 - 05 - 09))),
        Transaction::build(DocType::Income, date!(2025 - 05 - 20), 450.0)
            .doc_no("INV-102")
            .counterparty("Harbour Hotel")
            .description("Breakfast supplies")
            .category("Wholesale")
            .vat_amount(58.5),
        Transaction::build(DocType::Expense, date!(2025 - 05 - 06), 180.0)
            .doc_no("R-2231")
            .counterparty("Office Mart")
            .description("Till rolls and stationery")
            .category("Office")
            .vat_amount(43.2)
            .bank_account("Alpha Business")
            .status(PaymentStatus::Paid)
            .payment_date(Some(date!(2025 - 05 - 06))),
        Transaction::build(DocType::Bill, date!(2025 - 05 - 28), 400.0)
            .doc_no("TIM-88")
            .counterparty("Aegean Coffee Roasters")
            .description("Monthly coffee order")
            .category("Stock")
            .vat_amount(96.0)
            .payment_method(PaymentMethod::Credit),
        Transaction::build(DocType::Income, date!(2025 - 06 - 03), 1200.0)
            .doc_no("INV-103")
            .counterparty("Meltemi Cafe")
            .description("June catering")
            .category("Catering")
            .vat_amount(288.0)
            .payment_method(PaymentMethod::Cash)
            .bank_account("Ταμείο")
            .status(PaymentStatus::Paid)
            .payment_date(Some(date!(2025 - 06 - 03))),
        Transaction::build(DocType::Bill, date!(2025 - 06 - 10), 250.0)
            .doc_no("TIM-91")
            .counterparty("Aegean Coffee Roasters")
            .description("Top-up order")
            .category("Stock")
            .vat_amount(60.0)
            .payment_method(PaymentMethod::Credit),
        Transaction::build(DocType::CashWithdrawal, date!(2025 - 06 - 13), 300.0)
            .description("Float for the till")
            .bank_account("Alpha Business")
            .status(PaymentStatus::Paid)
            .payment_date(Some(date!(2025 - 06 - 13))),
        Transaction::build(DocType::CashDeposit, date!(2025 - 06 - 14), 300.0)
            .description("Float into the till")
            .payment_method(PaymentMethod::Cash)
            .bank_account("Ταμείο")
            .status(PaymentStatus::Paid)
            .payment_date(Some(date!(2025 - 06 - 14))),
        Transaction::build(DocType::Transfer, date!(2025 - 06 - 20), 500.0)
            .description("Move savings")
            .bank_account("Alpha Business")
            .status(PaymentStatus::Paid)
            .payment_date(Some(date!(2025 - 06 - 20))),
        Transaction::build(DocType::BankOperation, date!(2025 - 06 - 30), 12.5)
            .description("Account maintenance fee")
            .bank_account("Alpha Business")
            .status(PaymentStatus::Paid)
            .payment_date(Some(date!(2025 - 06 - 30))),
        Transaction::build(DocType::EquityDistribution, date!(2025 - 06 - 30), 800.0)
            .counterparty("Owner")
            .description("June distribution")
            .bank_account("Alpha Business")
            .status(PaymentStatus::Paid)
            .payment_date(Some(date!(2025 - 06 - 30))),
    ];

    for builder in demo_journal {
        store.insert(builder)?;
    }

    println!("Success!");

    Ok(())
}
