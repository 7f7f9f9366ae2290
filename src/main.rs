//! Canteen Ledger CLI
//!
//! Interactive console for the canteen point-of-sale and student wallets.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --data-dir /srv/canteen
//! cargo run -- --config canteen.toml --no-seed
//! RUST_LOG=info cargo run
//! ```
//!
//! Missing record files are created with sample data (admin `admin1` /
//! `admin123`, student `student1` / `pass123`) unless `--no-seed` is given.
//! Logs go to stderr; the level is taken from `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable config, store could not be initialized, console I/O failure)

use canteen_ledger::cli;
use canteen_ledger::core::Canteen;
use canteen_ledger::io::initialize_store;
use std::io::{self, BufWriter};
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = cli::parse_args();

    let config = match args.to_store_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if !args.no_seed {
        if let Err(e) = initialize_store(&config) {
            error!(error = %e, "failed to initialize store");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    let canteen = Canteen::open(&config);
    let stdin = io::stdin();
    let stdout = BufWriter::new(io::stdout());
    if let Err(e) = cli::Console::new(&canteen, stdin.lock(), stdout).run() {
        error!(error = %e, "console terminated");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
