// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use busbook::application::BookingLedger;
use busbook::cli::{Session, DEFAULT_MAX_SEATS};
use busbook::domain::{parse_departure, Route, RouteId};

/// Helper to create a ledger over the built-in schedule
pub fn seeded_ledger() -> BookingLedger {
    BookingLedger::new()
}

/// Helper to build a route with a departure given as text
pub fn make_route(id: RouteId, description: &str, departure: &str, fare: u64, seats: u32) -> Route {
    Route::new(id, description, parse_departure(departure).unwrap(), fare, seats)
}

/// Test fixture: a tiny two-route network for exhausting capacity quickly
pub fn small_ledger() -> Result<BookingLedger> {
    Ok(BookingLedger::with_routes(vec![
        make_route(10, "saddar - clifton", "07:30 AM", 250, 4),
        make_route(20, "malir - tower", "06:00 PM", 400, 2),
    ])?)
}

/// Seats available on a route, straight from the route table
pub fn seats_available(ledger: &BookingLedger, route_id: RouteId) -> u32 {
    ledger.get_route(route_id).unwrap().seats_available
}

/// Run a scripted session and return everything it printed
pub fn run_script(ledger: BookingLedger, script: &str) -> Result<(String, Session)> {
    let mut session = Session::new(ledger, DEFAULT_MAX_SEATS);
    let mut output = Vec::new();
    session.run(script.as_bytes(), &mut output)?;
    Ok((String::from_utf8(output)?, session))
}
