// ABOUTME: Entry point for the parklot binary.
// ABOUTME: Parses CLI flags, loads configuration, initializes tracing, and runs the menu session.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use parklot_console::{ParklotConfig, Session, load_registry};
use parklot_store::RecordsFile;

/// Terminal parking lot administration.
#[derive(Parser)]
#[command(name = "parklot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the records file (overrides PARKLOT_RECORDS)
    #[arg(short, long)]
    records: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; the environment and defaults still apply.
    let _ = dotenvy::dotenv();

    let default_filter = match cli.verbose {
        0 => "parklot=warn",
        1 => "parklot=info",
        _ => "parklot=debug",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    let mut config = ParklotConfig::from_env().context("invalid configuration")?;
    if let Some(path) = cli.records {
        config.records_path = path;
    }
    if config.uses_default_secret {
        tracing::warn!("PARKLOT_ADMIN_SECRET is not set; the admin panel uses the built-in default secret");
    }
    tracing::info!("parklot starting with records at {}", config.records_path.display());

    let store = RecordsFile::new(config.records_path.clone());
    let stdout = io::stdout();
    let registry = load_registry(&store, &mut stdout.lock())
        .with_context(|| format!("failed to load {}", store.path().display()))?;

    let mut session = Session::new(
        registry,
        store,
        config.admin_secret,
        io::stdin().lock(),
        stdout.lock(),
    );
    session.run()?;

    tracing::info!("parklot exiting");
    Ok(())
}
