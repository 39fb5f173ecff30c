use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Rupees;

pub type RouteId = u32;

/// Display format for departure times, e.g. "09:00 AM".
pub const DEPARTURE_FORMAT: &str = "%I:%M %p";

/// A scheduled bus service. Everything except `seats_available` is fixed
/// for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub description: String,
    pub departure: NaiveTime,
    /// Fare per seat
    pub fare: Rupees,
    /// Seats the route started the session with
    pub capacity: u32,
    /// Remaining unbooked seats (never exceeds `capacity`)
    pub seats_available: u32,
}

impl Route {
    pub fn new(
        id: RouteId,
        description: impl Into<String>,
        departure: NaiveTime,
        fare: Rupees,
        capacity: u32,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            departure,
            fare,
            capacity,
            seats_available: capacity,
        }
    }

    pub fn seats_booked(&self) -> u32 {
        self.capacity.saturating_sub(self.seats_available)
    }

    pub fn has_seats(&self, requested: u32) -> bool {
        self.seats_available >= requested
    }

    pub fn departure_label(&self) -> String {
        format_departure(self.departure)
    }
}

const fn seed_time(hour: u32, min: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, min, 0) {
        Some(time) => time,
        None => panic!("invalid seed departure time"),
    }
}

struct SeedRoute {
    id: RouteId,
    description: &'static str,
    departure: NaiveTime,
    fare: Rupees,
    seats: u32,
}

const SEED_ROUTES: [SeedRoute; 3] = [
    SeedRoute {
        id: 1,
        description: "north nazimabad - power house",
        departure: seed_time(9, 0),
        fare: 500,
        seats: 30,
    },
    SeedRoute {
        id: 2,
        description: "kda - gulshan",
        departure: seed_time(12, 0),
        fare: 700,
        seats: 30,
    },
    SeedRoute {
        id: 3,
        description: "ayesha manzil - bahria",
        departure: seed_time(17, 0),
        fare: 600,
        seats: 30,
    },
];

/// The built-in route table every session starts from unless a route file
/// is supplied.
pub fn seed_routes() -> Vec<Route> {
    SEED_ROUTES
        .iter()
        .map(|seed| Route::new(seed.id, seed.description, seed.departure, seed.fare, seed.seats))
        .collect()
}

/// Format a departure time as "09:00 AM".
pub fn format_departure(time: NaiveTime) -> String {
    time.format(DEPARTURE_FORMAT).to_string()
}

/// Parse a departure time. Accepts 12-hour ("05:00 PM", "5:00 pm") and
/// 24-hour ("17:00") forms.
pub fn parse_departure(input: &str) -> Result<NaiveTime, ParseDepartureError> {
    let input = input.trim();
    let upper = input.to_uppercase();

    NaiveTime::parse_from_str(&upper, DEPARTURE_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|_| ParseDepartureError::InvalidFormat(input.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDepartureError {
    InvalidFormat(String),
}

impl fmt::Display for ParseDepartureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseDepartureError::InvalidFormat(input) => {
                write!(f, "invalid departure time '{}' (expected HH:MM AM/PM or HH:MM)", input)
            }
        }
    }
}

impl std::error::Error for ParseDepartureError {}
