use std::collections::HashMap;

use super::{total_fare, Booking, Route, RouteId, Rupees};

/// Seats held by active bookings on a single route.
pub fn seats_booked(route_id: RouteId, bookings: &[Booking]) -> u32 {
    bookings
        .iter()
        .filter(|b| b.route_id == route_id)
        .map(|b| b.seats)
        .sum()
}

/// Seats held by active bookings, grouped by route.
pub fn compute_booked_seats(bookings: &[Booking]) -> HashMap<RouteId, u32> {
    let mut booked: HashMap<RouteId, u32> = HashMap::new();

    for booking in bookings {
        *booked.entry(booking.route_id).or_insert(0) += booking.seats;
    }

    booked
}

/// Check a seat request against a route and price it.
/// Returns the total fare the booking would carry.
pub fn validate_seat_request(route: &Route, requested: u32) -> Result<Rupees, SeatRequestError> {
    if requested == 0 {
        return Err(SeatRequestError::ZeroSeats);
    }
    if !route.has_seats(requested) {
        return Err(SeatRequestError::InsufficientSeats {
            available: route.seats_available,
            requested,
        });
    }
    total_fare(requested, route.fare).ok_or(SeatRequestError::FareOverflow {
        seats: requested,
        fare: route.fare,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatRequestError {
    ZeroSeats,
    InsufficientSeats { available: u32, requested: u32 },
    FareOverflow { seats: u32, fare: Rupees },
}

impl std::fmt::Display for SeatRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatRequestError::ZeroSeats => write!(f, "at least one seat must be requested"),
            SeatRequestError::InsufficientSeats {
                available,
                requested,
            } => write!(
                f,
                "requested {} seats but only {} available",
                requested, available
            ),
            SeatRequestError::FareOverflow { seats, fare } => {
                write!(f, "total fare for {} seats at {} overflows", seats, fare)
            }
        }
    }
}

impl std::error::Error for SeatRequestError {}

/// Seat accounting for one route as seen by an integrity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteIntegrity {
    pub route_id: RouteId,
    pub capacity: u32,
    pub booked: u32,
    pub seats_available: u32,
}

impl RouteIntegrity {
    /// Seats available must equal capacity minus booked seats.
    pub fn is_consistent(&self) -> bool {
        self.booked <= self.capacity && self.capacity - self.booked == self.seats_available
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityReport {
    pub routes: Vec<RouteIntegrity>,
    /// Bookings pointing at a route id not in the table
    pub orphaned_bookings: usize,
}

impl IntegrityReport {
    pub fn is_ok(&self) -> bool {
        self.orphaned_bookings == 0 && self.routes.iter().all(RouteIntegrity::is_consistent)
    }

    pub fn inconsistent_routes(&self) -> impl Iterator<Item = &RouteIntegrity> {
        self.routes.iter().filter(|r| !r.is_consistent())
    }
}

/// Recompute seat usage from the booking list and compare it with every
/// route's stored seat count.
pub fn build_integrity_report<'a>(
    routes: impl IntoIterator<Item = &'a Route>,
    bookings: &[Booking],
) -> IntegrityReport {
    let mut booked = compute_booked_seats(bookings);

    let routes: Vec<RouteIntegrity> = routes
        .into_iter()
        .map(|route| RouteIntegrity {
            route_id: route.id,
            capacity: route.capacity,
            booked: booked.remove(&route.id).unwrap_or(0),
            seats_available: route.seats_available,
        })
        .collect();

    // Whatever is left in `booked` references unknown routes
    let orphaned_bookings = bookings
        .iter()
        .filter(|b| booked.contains_key(&b.route_id))
        .count();

    IntegrityReport {
        routes,
        orphaned_bookings,
    }
}
