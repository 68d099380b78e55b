//! tablestore Inspection Binary
//!
//! Reopens a persisted file table and prints or verifies it.

use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tablestore::table::TableView;
use tablestore::{Config, ContentAddressedFileTable, Fingerprint, Result, Table};
use tracing_subscriber::{fmt, EnvFilter};

/// tablestore table inspector
#[derive(Parser, Debug)]
#[command(name = "tablestore-inspect")]
#[command(about = "Inspect a persisted tablestore table")]
#[command(version)]
struct Args {
    /// Base directory (tables live under {base_dir}/tables)
    #[arg(short, long, default_value = "./data")]
    base_dir: String,

    /// Name of the table to open
    table: String,

    /// Output format for the rows
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Recount rows and recompute the fingerprint from the state files
    #[arg(long)]
    verify: bool,
}

type CliResult<T> = std::result::Result<T, Box<dyn Error>>;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Boxed table sorted by primary key
    Table,
    /// One JSON array per row
    Json,
    /// Schema, size and fingerprint only
    Summary,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tablestore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("tablestore-inspect v{}", tablestore::VERSION);
    tracing::info!("Base directory: {}", args.base_dir);

    let config = Config::builder().base_dir(&args.base_dir).build();

    let table = match ContentAddressedFileTable::reopen(&config, &args.table) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("Failed to open table `{}`: {}", args.table, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = print(&table, args.format) {
        tracing::error!("Failed to read table `{}`: {}", args.table, e);
        return ExitCode::FAILURE;
    }

    if args.verify {
        match verify(&table) {
            Ok(true) => tracing::info!("Verification passed"),
            Ok(false) => return ExitCode::FAILURE,
            Err(e) => {
                tracing::error!("Verification failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn print(table: &ContentAddressedFileTable, format: Format) -> CliResult<()> {
    match format {
        Format::Table => print!("{}", TableView::of(table)?),
        Format::Json => write_json_lines(table, io::stdout().lock())?,
        Format::Summary => {
            let schema = table.schema();
            let columns: Vec<String> = schema
                .columns()
                .iter()
                .map(|c| format!("{} {}", c.name, c.ty))
                .collect();
            println!("table:       {}", schema.name());
            println!("columns:     {}", columns.join(", "));
            println!("primary:     {}", schema.primary_column().name);
            println!("size:        {}", table.size());
            println!("fingerprint: {}", table.fingerprint());
            println!("record:      {} bytes", table.record_width());
        }
    }
    Ok(())
}

/// Write one JSON array per row; the first failing row aborts the dump
fn write_json_lines<W: Write>(table: &dyn Table, mut out: W) -> CliResult<()> {
    for row in table.rows() {
        serde_json::to_writer(&mut out, &row?)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Compare the stored counters against a full scan of `state/`
fn verify(table: &ContentAddressedFileTable) -> Result<bool> {
    let mut count = 0usize;
    let mut fingerprint = Fingerprint::ZERO;
    for row in table.rows() {
        fingerprint.include(&row?);
        count += 1;
    }

    let mut ok = true;
    if count != table.size() {
        tracing::error!("Size mismatch: metadata says {}, state holds {}", table.size(), count);
        ok = false;
    }
    if fingerprint != table.fingerprint() {
        tracing::error!(
            "Fingerprint mismatch: metadata says {}, state hashes to {}",
            table.fingerprint(),
            fingerprint
        );
        ok = false;
    }
    Ok(ok)
}
