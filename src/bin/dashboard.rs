use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use defteri::{
    Transaction, TransactionFilter, import, initialize_db,
    ledger::{
        AgingReport, MonthlyTotals, PeriodTotals, VatSummary, aging, cash_balances,
        monthly_breakdown, period_totals, vat_summary,
    },
    report,
    stores::{SqliteTransactionStore, TransactionStore},
};

/// Print the financial overview of a journal for one year.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the journal SQLite database.
    #[arg(long)]
    db_path: String,

    /// The year to report on. Defaults to the most recent year in the
    /// journal.
    #[arg(long)]
    year: Option<i32>,

    /// Reference date for the aging report (YYYY-MM-DD). Defaults to
    /// today.
    #[arg(long)]
    as_of: Option<String>,

    /// Print the journal rows matching this text instead of the report.
    #[arg(long)]
    search: Option<String>,

    /// Also run the data-quality checks over the whole journal.
    #[arg(long, default_value_t = false)]
    checks: bool,

    /// Print the report as JSON instead of plain text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// The year report as one serializable value for `--json`.
#[derive(Debug, Serialize)]
struct DashboardReport {
    year: i32,
    totals: PeriodTotals,
    vat: VatSummary,
    monthly: Vec<MonthlyTotals>,
    balances: Vec<(String, f64)>,
    aging: AgingReport,
}

fn main() {
    setup_logging();

    let args = Args::parse();

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            eprintln!("Could not open the database at {}: {error}", args.db_path);
            exit(1);
        }
    };

    if let Err(error) = initialize_db(&connection) {
        eprintln!("Could not initialise the database schema: {error}");
        exit(1);
    }

    let store = SqliteTransactionStore::new(Arc::new(Mutex::new(connection)));

    let transactions = match store.load_all() {
        Ok(transactions) => transactions,
        Err(error) => {
            eprintln!("Could not load the journal: {error}");
            exit(1);
        }
    };

    if let Some(needle) = &args.search {
        let matches = TransactionFilter {
            search: Some(needle.clone()),
            ..Default::default()
        }
        .apply(&transactions);

        println!("{} row(s) matching '{needle}':", matches.len());
        print!("{}", report::render_journal(&matches));
        return;
    }

    let year = args
        .year
        .or_else(|| latest_year(&transactions))
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());

    let as_of = match &args.as_of {
        None => OffsetDateTime::now_utc().date(),
        Some(text) => match import::fields::parse_date(text) {
            Some(date) => date,
            None => {
                eprintln!("Could not read '{text}' as a date; use YYYY-MM-DD.");
                exit(1);
            }
        },
    };

    let year_transactions = TransactionFilter::year(year).apply(&transactions);

    let totals = period_totals(&year_transactions);
    let vat = vat_summary(&year_transactions);
    let balances = cash_balances(&year_transactions);
    let monthly = monthly_breakdown(&year_transactions);
    // Unpaid rows stay relevant however old they are, so aging runs over
    // the whole journal rather than the selected year.
    let open_items = aging(&transactions, as_of);

    if args.json {
        let mut balance_rows: Vec<(String, f64)> = balances.into_iter().collect();
        balance_rows.sort_by(|a, b| a.0.cmp(&b.0));

        let dashboard = DashboardReport {
            year,
            totals,
            vat,
            monthly,
            balances: balance_rows,
            aging: open_items,
        };

        match serde_json::to_string_pretty(&dashboard) {
            Ok(json) => println!("{json}"),
            Err(error) => {
                eprintln!("Could not serialise the report: {error}");
                exit(1);
            }
        }
        return;
    }

    let net_cash: f64 = balances.values().sum();

    println!("Overview for {year}");
    println!("{}", report::render_overview(&totals, &vat, net_cash));

    println!("Monthly breakdown");
    println!("{}", report::render_monthly(&monthly));

    println!("Balances");
    println!("{}", report::render_balances(&balances));

    println!("Aging as of {as_of}");
    println!("{}", report::render_aging(&open_items));

    if args.checks {
        println!("Checks");
        print!("{}", report::render_checks(&transactions));
    }
}

fn latest_year(transactions: &[Transaction]) -> Option<i32> {
    transactions
        .iter()
        .map(|transaction| transaction.doc_date.year())
        .max()
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}
