mod session;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{stdin, stdout};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::application::BookingLedger;
use crate::io::load_routes_file;

pub use session::{ExportFormat, ExportTarget, Flow, Session, SessionCommand, DEFAULT_MAX_SEATS};

/// Busbook - Bus Ticket Booking
#[derive(Parser)]
#[command(name = "busbook")]
#[command(about = "Browse bus routes, book seats and cancel bookings in an interactive session")]
#[command(version)]
pub struct Cli {
    /// Load the route table from a JSON file instead of the built-in schedule
    #[arg(long, value_name = "FILE")]
    pub routes: Option<PathBuf>,

    /// Maximum seats a single booking may reserve
    #[arg(long, default_value_t = DEFAULT_MAX_SEATS, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_seats: u32,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_logging(self.verbose);

        let ledger = match &self.routes {
            Some(path) => {
                let routes = load_routes_file(path)?;
                BookingLedger::with_routes(routes)
                    .with_context(|| format!("Invalid route table in {}", path.display()))?
            }
            None => BookingLedger::new(),
        };
        debug!(
            routes = ledger.list_routes().len(),
            max_seats = self.max_seats,
            "Session starting"
        );

        let mut session = Session::new(ledger, self.max_seats);
        session.run(stdin().lock(), stdout().lock())
    }
}

/// Log to stderr so diagnostics never interleave with session output.
/// `RUST_LOG` overrides the level picked from `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
