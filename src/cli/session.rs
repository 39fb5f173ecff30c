use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::application::{BookingLedger, LedgerError};
use crate::domain::{format_departure, format_fare, Route, RouteId};
use crate::io::Exporter;

/// Per-booking seat ceiling, matching the booking form the schedule was
/// originally sold through.
pub const DEFAULT_MAX_SEATS: u32 = 10;

/// One line of session input.
#[derive(Parser, Debug)]
#[command(name = "busbook", no_binary_name = true, disable_version_flag = true)]
#[command(
    after_help = "Arguments are separated by whitespace and quoting is not supported: \
                  file paths cannot contain spaces, and repeated spaces inside a \
                  passenger name collapse to one."
)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Show available bus schedules
    Routes,

    /// Book seats on a route
    Book {
        /// Route ID (see `routes`)
        route: RouteId,

        /// Number of seats
        seats: u32,

        /// Passenger name
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },

    /// Cancel the earliest booking made under a name
    Cancel {
        /// Passenger name
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },

    /// Show current bookings
    Bookings,

    /// Verify seat counts against bookings
    Check,

    /// Export session data to CSV or JSON
    Export {
        /// What to export
        #[arg(value_enum)]
        target: ExportTarget,

        /// Output format [default: csv; session exports are JSON only]
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Output file without spaces (printed to the session if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    Bookings,
    Routes,
    Session,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Whether the session keeps reading input after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// An interactive booking session. Owns the ledger for its whole lifetime;
/// the ledger is dropped when the session ends.
pub struct Session {
    ledger: BookingLedger,
    max_seats: u32,
}

impl Session {
    pub fn new(ledger: BookingLedger, max_seats: u32) -> Self {
        Self { ledger, max_seats }
    }

    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    /// Read commands line by line until `quit` or end of input.
    /// A line that is not valid UTF-8 is reported and skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> Result<()> {
        writeln!(out, "Bus Ticket Booking System")?;
        writeln!(out, "Type 'help' for a list of commands.")?;

        let mut buf = Vec::new();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .context("Failed to read session input")?;
            if read == 0 {
                writeln!(out)?;
                break;
            }

            let Ok(line) = std::str::from_utf8(&buf) else {
                warn!(bytes = buf.len(), "Skipping session input that is not valid UTF-8");
                writeln!(out, "Error: input is not valid UTF-8")?;
                continue;
            };

            if self.execute_line(line, &mut out)? == Flow::Quit {
                break;
            }
        }

        debug!(bookings = self.ledger.bookings().len(), "Session ended");
        Ok(())
    }

    /// Parse and execute a single line of input. Usage mistakes and ledger
    /// refusals are reported to `out`; only output failures are errors.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let args: Vec<&str> = line.split_whitespace().collect();
        if args.is_empty() {
            return Ok(Flow::Continue);
        }

        match SessionLine::try_parse_from(args) {
            Ok(parsed) => self.execute(parsed.command, out),
            Err(err) => {
                // Covers both `help` output and genuine usage errors
                write!(out, "{}", err.render())?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute<W: Write>(&mut self, command: SessionCommand, out: &mut W) -> Result<Flow> {
        debug!(?command, "Executing session command");

        match command {
            SessionCommand::Routes => {
                writeln!(out, "Available Bus Schedules")?;
                render_routes(out, &self.ledger.list_routes())?;
            }

            SessionCommand::Book { route, seats, name } => {
                self.book(route, seats, &name.join(" "), out)?;
            }

            SessionCommand::Cancel { name } => {
                self.cancel(&name.join(" "), out)?;
            }

            SessionCommand::Bookings => {
                self.show_bookings(out)?;
            }

            SessionCommand::Check => {
                self.check(out)?;
            }

            SessionCommand::Export {
                target,
                format,
                output,
            } => {
                if let Err(err) = self.export(target, format, output.as_deref(), out) {
                    writeln!(out, "Error: {:#}", err)?;
                }
            }

            SessionCommand::Quit => {
                writeln!(out, "Goodbye.")?;
                return Ok(Flow::Quit);
            }
        }

        Ok(Flow::Continue)
    }

    fn book<W: Write>(&mut self, route: RouteId, seats: u32, name: &str, out: &mut W) -> Result<()> {
        if !(1..=self.max_seats).contains(&seats) {
            writeln!(
                out,
                "Error: Number of seats must be between 1 and {}.",
                self.max_seats
            )?;
            return Ok(());
        }

        match self.ledger.create_booking(route, name, seats) {
            Ok(confirmation) => {
                writeln!(
                    out,
                    "Booking successful for {}! Total Fare: {}",
                    confirmation.booking.name,
                    format_fare(confirmation.booking.total_fare)
                )?;
                writeln!(
                    out,
                    "  {} seat(s) on {} ({} left)",
                    confirmation.booking.seats,
                    confirmation.route_description,
                    confirmation.seats_remaining
                )?;
            }
            Err(LedgerError::InsufficientSeats { available, .. }) => {
                writeln!(
                    out,
                    "Error: Not enough seats available! ({} left on route {})",
                    available, route
                )?;
            }
            Err(err) => report_error(out, &err)?,
        }
        Ok(())
    }

    fn cancel<W: Write>(&mut self, name: &str, out: &mut W) -> Result<()> {
        match self.ledger.cancel_booking(name) {
            Ok(cancellation) => {
                writeln!(
                    out,
                    "Booking for {} cancelled successfully.",
                    cancellation.booking.name
                )?;
                if cancellation.remaining_for_name > 0 {
                    writeln!(
                        out,
                        "Note: {} more booking(s) remain under {}.",
                        cancellation.remaining_for_name, name
                    )?;
                }
            }
            Err(LedgerError::EmptyLedger) => {
                writeln!(out, "No bookings found to cancel.")?;
            }
            Err(err) => report_error(out, &err)?,
        }
        Ok(())
    }

    fn show_bookings<W: Write>(&self, out: &mut W) -> Result<()> {
        let bookings = self.ledger.list_bookings();
        if bookings.is_empty() {
            writeln!(out, "No bookings yet.")?;
            return Ok(());
        }

        writeln!(
            out,
            "{:<20} {:<32} {:<10} {:>6} {:>12}",
            "NAME", "ROUTE", "TIME", "SEATS", "TOTAL FARE"
        )?;
        writeln!(out, "{}", "-".repeat(84))?;
        for booking in bookings {
            writeln!(
                out,
                "{:<20} {:<32} {:<10} {:>6} {:>12}",
                truncate(&booking.name, 20),
                truncate(&booking.route_description, 32),
                format_departure(booking.departure),
                booking.seats,
                format_fare(booking.total_fare)
            )?;
        }
        Ok(())
    }

    fn check<W: Write>(&self, out: &mut W) -> Result<()> {
        let report = self.ledger.check_integrity();

        writeln!(out, "Checking seat counts...")?;
        writeln!(
            out,
            "{:<4} {:>8} {:>8} {:>10}  STATUS",
            "ID", "CAPACITY", "BOOKED", "AVAILABLE"
        )?;
        for route in &report.routes {
            writeln!(
                out,
                "{:<4} {:>8} {:>8} {:>10}  {}",
                route.route_id,
                route.capacity,
                route.booked,
                route.seats_available,
                if route.is_consistent() { "ok" } else { "MISMATCH" }
            )?;
        }
        if report.orphaned_bookings > 0 {
            writeln!(
                out,
                "{} booking(s) reference unknown routes",
                report.orphaned_bookings
            )?;
        }

        if report.is_ok() {
            writeln!(out, "Ledger is consistent.")?;
        } else {
            writeln!(out, "Ledger has inconsistencies!")?;
        }
        Ok(())
    }

    fn export<W: Write>(
        &self,
        target: ExportTarget,
        format: Option<ExportFormat>,
        output: Option<&Path>,
        out: &mut W,
    ) -> Result<()> {
        let format = match (target, format) {
            (ExportTarget::Session, Some(ExportFormat::Csv)) => {
                anyhow::bail!("session exports are JSON only")
            }
            (ExportTarget::Session, _) => ExportFormat::Json,
            (_, format) => format.unwrap_or(ExportFormat::Csv),
        };
        let exporter = Exporter::new(&self.ledger);

        let count = match output {
            Some(path) => {
                let count =
                    write_export_file(path, |file| export_to(&exporter, target, format, file))?;
                writeln!(out, "Exported {} {} to {}", count, target.noun(), path.display())?;
                count
            }
            None => export_to(&exporter, target, format, &mut *out)?,
        };

        debug!(?target, ?format, count, "Export finished");
        Ok(())
    }
}

impl ExportTarget {
    fn noun(self) -> &'static str {
        match self {
            ExportTarget::Bookings => "bookings",
            ExportTarget::Routes => "routes",
            ExportTarget::Session => "records",
        }
    }
}

/// Create `path` and hand it to `write`. A file left behind by a failed
/// write is removed so no partial export remains on disk.
fn write_export_file<F>(path: &Path, write: F) -> Result<usize>
where
    F: FnOnce(File) -> Result<usize>,
{
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    write(file).map_err(|err| {
        if let Err(remove_err) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %remove_err, "Failed to remove partial export");
        }
        err.context(format!("Failed to write export to {}", path.display()))
    })
}

/// Returns the number of records written.
fn export_to<W: Write>(
    exporter: &Exporter<'_>,
    target: ExportTarget,
    format: ExportFormat,
    writer: W,
) -> Result<usize> {
    match (target, format) {
        (ExportTarget::Bookings, ExportFormat::Csv) => exporter.export_bookings_csv(writer),
        (ExportTarget::Bookings, ExportFormat::Json) => exporter.export_bookings_json(writer),
        (ExportTarget::Routes, ExportFormat::Csv) => exporter.export_routes_csv(writer),
        (ExportTarget::Routes, ExportFormat::Json) => exporter.export_routes_json(writer),
        (ExportTarget::Session, _) => {
            let snapshot = exporter.export_session_json(writer)?;
            Ok(snapshot.routes.len() + snapshot.bookings.len())
        }
    }
}

fn report_error<W: Write>(out: &mut W, err: &LedgerError) -> std::io::Result<()> {
    if err.is_informational() {
        writeln!(out, "{}.", err)
    } else {
        writeln!(out, "Error: {}", err)
    }
}

fn render_routes<W: Write>(out: &mut W, routes: &[Route]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<4} {:<32} {:<10} {:>10} {:>6}",
        "ID", "ROUTE", "TIME", "FARE", "SEATS"
    )?;
    writeln!(out, "{}", "-".repeat(66))?;
    for route in routes {
        writeln!(
            out,
            "{:<4} {:<32} {:<10} {:>10} {:>6}",
            route.id,
            truncate(&route.description, 32),
            route.departure_label(),
            format_fare(route.fare),
            route.seats_available
        )?;
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
