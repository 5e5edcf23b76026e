use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use sales_dashboard::{initialize_db, insert_seed_records, parse_seed_records};

/// A utility for creating a test database for the sales dashboard from a
/// local copy of the seed feed.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// File path to a JSON array of sales in the same format as the seed feed.
    #[arg(long, short)]
    seed_file: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Reading sales from {:#?}", args.seed_file);
    let records = parse_seed_records(&fs::read(&args.seed_file)?)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let inserted = insert_seed_records(records, &conn)?;

    println!("Inserted {inserted} sales.");
    println!("Success!");

    Ok(())
}
