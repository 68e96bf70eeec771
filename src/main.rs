use clap::Parser;
use hotel_ledger::application::engine::{LedgerEngine, Stores};
use hotel_ledger::config::LedgerConfig;
use hotel_ledger::infrastructure::in_memory::in_memory_stores;
use hotel_ledger::interfaces::csv::report_writer::ReportWriter;
use hotel_ledger::interfaces::journal::JournalReader;
use hotel_ledger::logging::init_logging;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Command journal (JSON Lines, one command per line)
    journal: PathBuf,

    /// Path to persistent database (optional). Requires the `storage-rocksdb` feature.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// YAML configuration file layered over `hotel-ledger.yaml`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append a revenue breakdown across all bills
    #[arg(long)]
    revenue: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = LedgerConfig::load(cli.config.as_deref()).into_diagnostic()?;
    if cli.db_path.is_some() {
        config.storage.db_path = cli.db_path;
    }
    init_logging(&config.logging);

    let stores = open_stores(&config)?;
    let engine = LedgerEngine::new(stores, config.ledger.max_write_attempts);

    let file = File::open(&cli.journal).into_diagnostic()?;
    let reader = JournalReader::new(BufReader::new(file));
    let (mut applied, mut rejected) = (0usize, 0usize);
    for (line, entry) in reader.entries() {
        match entry {
            Ok(entry) => {
                let op = entry.command.name();
                match engine.process_command(entry).await {
                    Ok(()) => applied += 1,
                    Err(e) => {
                        rejected += 1;
                        warn!(line, op, status = e.status_code(), error = %e, "rejected command");
                    }
                }
            }
            Err(e) => {
                rejected += 1;
                warn!(line, error = %e, "Error reading journal entry");
            }
        }
    }
    info!(applied, rejected, "journal replayed");

    let snapshot = engine.into_snapshot().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_bills(&snapshot.bills).into_diagnostic()?;
    writer.write_members(&snapshot.members).into_diagnostic()?;
    writer.write_orders(&snapshot.orders).into_diagnostic()?;
    writer
        .write_order_stats(&snapshot.order_stats)
        .into_diagnostic()?;
    if cli.revenue {
        writer.write_revenue(&snapshot.revenue).into_diagnostic()?;
    }

    Ok(())
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(config: &LedgerConfig) -> Result<Stores> {
    use hotel_ledger::domain::ports::{BillStoreBox, FoodOrderStoreBox, MemberStoreBox};
    use hotel_ledger::infrastructure::rocksdb::RocksDBStore;

    let Some(db_path) = &config.storage.db_path else {
        return Ok(in_memory_stores());
    };

    let store = RocksDBStore::open(db_path).into_diagnostic()?;
    info!(path = %db_path.display(), "using RocksDB storage");

    let members: MemberStoreBox = Box::new(store.clone());
    let bills: BillStoreBox = Box::new(store.clone());
    let orders: FoodOrderStoreBox = Box::new(store);
    Ok(Stores {
        members,
        bills,
        orders,
    })
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(config: &LedgerConfig) -> Result<Stores> {
    if config.storage.db_path.is_some() {
        warn!(
            "persistent storage requested but the 'storage-rocksdb' feature is not enabled, falling back to in-memory storage"
        );
    }
    Ok(in_memory_stores())
}
