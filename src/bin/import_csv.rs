use std::fs;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use defteri::{
    import::parse_journal_csv,
    initialize_db,
    stores::{SqliteTransactionStore, TransactionStore},
};

/// Import a CSV journal export into a journal database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the journal SQLite database. Created if it does not
    /// exist yet.
    #[arg(long)]
    db_path: String,

    /// File path to the CSV file to import.
    #[arg(long)]
    csv_path: String,

    /// Replace the whole journal with the file instead of appending to
    /// it.
    #[arg(long, default_value_t = false)]
    replace: bool,
}

fn main() {
    setup_logging();

    let args = Args::parse();

    let text = match fs::read_to_string(&args.csv_path) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("Could not read {}: {error}", args.csv_path);
            exit(1);
        }
    };

    let today = OffsetDateTime::now_utc().date();

    let outcome = match parse_journal_csv(&text, today) {
        Ok(outcome) => outcome,
        Err(error) => {
            eprintln!("Could not import {}: {error}", args.csv_path);
            exit(1);
        }
    };

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

    let mut store = SqliteTransactionStore::new(Arc::new(Mutex::new(connection)));

    let row_count = outcome.builders.len();

    let stored = if args.replace {
        match store.replace_all(outcome.builders) {
            Ok(stored) => stored.len(),
            Err(error) => {
                eprintln!("Could not replace the journal: {error}");
                exit(1);
            }
        }
    } else {
        // Row-by-row on purpose: one rejected insert should not take the
        // rest of the file down with it.
        let mut inserted = 0;

        for (index, builder) in outcome.builders.into_iter().enumerate() {
            match store.insert(builder) {
                Ok(_) => inserted += 1,
                Err(error) => {
                    eprintln!("Could not store row {} of {row_count}: {error}", index + 1);
                }
            }
        }

        inserted
    };

    println!(
        "Imported {stored} transaction(s) ({} degraded cell(s), {} skipped row(s)).",
        outcome.degraded_cells, outcome.skipped_rows
    );
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}
