use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contract_ledger::db::{self, Store};
use contract_ledger::report;
use contract_ledger::session::Session;

#[derive(Parser)]
#[command(name = "contracts")]
#[command(about = "Manage projects and the contracts attached to them")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "CONTRACTS_DB", default_value = db::DEFAULT_DB_FILE, global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Run,
    /// Print stored contracts, newest snapshot of each
    Contracts {
        /// Print every saved snapshot instead
        #[arg(long)]
        all: bool,

        #[arg(long)]
        json: bool,
    },
    /// Print stored projects
    Projects {
        #[arg(long)]
        json: bool,
    },
}

/// Logs go to stderr; stdout is the menu.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "contract_ledger=warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let store = Store::open(&cli.db)
        .with_context(|| format!("Failed to open database {}", cli.db.display()))?;
    store.initialize().context("Failed to create tables")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!(db = %cli.db.display(), "Starting session");
            let stdin = io::stdin();
            let mut session = Session::new(store, stdin.lock(), io::stdout());
            session.run()?;
        }
        Commands::Contracts { all, json } => {
            let rows = if all {
                store.contract_log()?
            } else {
                store.latest_contracts()?
            };
            print!("{}", report::render_contracts(&rows, json)?);
        }
        Commands::Projects { json } => {
            let rows = store.project_rows()?;
            print!("{}", report::render_projects(&rows, json)?);
        }
    }

    Ok(())
}
