use chrono::{DateTime, NaiveTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::domain::{
    build_integrity_report, seed_routes, validate_seat_request, Booking, BookingId,
    IntegrityReport, Route, RouteId, Rupees,
};

use super::LedgerError;

/// In-memory booking ledger: the route table plus the list of active
/// bookings. This is the primary interface for any frontend.
///
/// Mutating operations take `&mut self`, so a ledger shared between callers
/// has to sit behind a lock.
#[derive(Debug, Clone)]
pub struct BookingLedger {
    routes: BTreeMap<RouteId, Route>,
    /// Active bookings in insertion order
    bookings: Vec<Booking>,
}

/// Result of a successful booking
#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub route_description: String,
    pub seats_remaining: u32,
}

/// Result of a successful cancellation
#[derive(Debug, Clone)]
pub struct Cancellation {
    pub booking: Booking,
    /// Seats available on the route after the release
    pub seats_available: u32,
    /// Bookings still active under the same name
    pub remaining_for_name: usize,
}

/// A booking joined with the route it references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub booking_id: BookingId,
    pub name: String,
    pub route_id: RouteId,
    pub route_description: String,
    pub departure: NaiveTime,
    pub seats: u32,
    pub total_fare: Rupees,
    pub booked_at: DateTime<Utc>,
}

impl Default for BookingLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingLedger {
    /// Create a ledger over the built-in route table.
    pub fn new() -> Self {
        let routes = seed_routes()
            .into_iter()
            .map(|route| (route.id, route))
            .collect();
        Self {
            routes,
            bookings: Vec::new(),
        }
    }

    /// Create a ledger over a custom route table.
    pub fn with_routes(routes: Vec<Route>) -> Result<Self, LedgerError> {
        if routes.is_empty() {
            return Err(LedgerError::InvalidRouteTable(
                "at least one route is required".to_string(),
            ));
        }

        let mut table = BTreeMap::new();
        for route in routes {
            if route.seats_available > route.capacity {
                return Err(LedgerError::InvalidRouteTable(format!(
                    "route {} has {} seats available but a capacity of {}",
                    route.id, route.seats_available, route.capacity
                )));
            }
            let id = route.id;
            if table.insert(id, route).is_some() {
                return Err(LedgerError::DuplicateRoute(id));
            }
        }

        debug!(routes = table.len(), "Ledger created from custom route table");
        Ok(Self {
            routes: table,
            bookings: Vec::new(),
        })
    }

    // ========================
    // Route operations
    // ========================

    /// All routes, ordered by id.
    pub fn list_routes(&self) -> Vec<Route> {
        self.routes.values().cloned().collect()
    }

    /// Get a single route.
    pub fn get_route(&self, route_id: RouteId) -> Result<&Route, LedgerError> {
        self.routes
            .get(&route_id)
            .ok_or(LedgerError::RouteNotFound(route_id))
    }

    // ========================
    // Booking operations
    // ========================

    /// Reserve `seats` seats on a route for a passenger.
    /// Either both the route's seat count and the booking list change, or
    /// neither does.
    pub fn create_booking(
        &mut self,
        route_id: RouteId,
        name: impl Into<String>,
        seats: u32,
    ) -> Result<BookingConfirmation, LedgerError> {
        let name = name.into();
        debug!(route_id, %name, seats, "Creating booking");

        if name.trim().is_empty() {
            warn!(route_id, "Booking created without a passenger name");
        }

        let route = self
            .routes
            .get_mut(&route_id)
            .ok_or(LedgerError::RouteNotFound(route_id))?;

        let total_fare = validate_seat_request(route, seats)
            .map_err(|err| LedgerError::from_seat_request(route_id, err))?;

        route.seats_available -= seats;
        let booking = Booking::new(name, route_id, seats, total_fare);
        self.bookings.push(booking.clone());

        info!(
            booking_id = %booking.id,
            route_id,
            seats,
            total_fare,
            seats_remaining = route.seats_available,
            "Booking created"
        );

        Ok(BookingConfirmation {
            booking,
            route_description: route.description.clone(),
            seats_remaining: route.seats_available,
        })
    }

    /// Cancel the first active booking (in insertion order) made under
    /// `name`, releasing its seats back to the route.
    pub fn cancel_booking(&mut self, name: &str) -> Result<Cancellation, LedgerError> {
        debug!(%name, "Cancelling booking");

        if self.bookings.is_empty() {
            return Err(LedgerError::EmptyLedger);
        }

        let index = self
            .bookings
            .iter()
            .position(|b| b.is_for(name))
            .ok_or_else(|| LedgerError::BookingNotFound(name.to_string()))?;

        let route = self
            .routes
            .get_mut(&self.bookings[index].route_id)
            .ok_or(LedgerError::RouteNotFound(self.bookings[index].route_id))?;

        let booking = self.bookings.remove(index);
        route.seats_available += booking.seats;
        let seats_available = route.seats_available;

        let remaining_for_name = self.bookings.iter().filter(|b| b.is_for(name)).count();
        if remaining_for_name > 0 {
            warn!(
                %name,
                remaining_for_name,
                "Cancelled the earliest booking; others under the same name remain"
            );
        }

        info!(
            booking_id = %booking.id,
            route_id = booking.route_id,
            seats = booking.seats,
            seats_available,
            "Booking cancelled"
        );

        Ok(Cancellation {
            booking,
            seats_available,
            remaining_for_name,
        })
    }

    /// Active bookings joined with their routes, in insertion order.
    pub fn list_bookings(&self) -> Vec<BookingView> {
        self.bookings
            .iter()
            .filter_map(|booking| {
                let route = self.routes.get(&booking.route_id)?;
                Some(BookingView {
                    booking_id: booking.id,
                    name: booking.name.clone(),
                    route_id: route.id,
                    route_description: route.description.clone(),
                    departure: route.departure,
                    seats: booking.seats,
                    total_fare: booking.total_fare,
                    booked_at: booking.booked_at,
                })
            })
            .collect()
    }

    /// Active bookings under a passenger name, in insertion order.
    pub fn bookings_for(&self, name: &str) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| b.is_for(name)).collect()
    }

    /// Raw active bookings, in insertion order.
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    // ========================
    // Integrity
    // ========================

    /// Verify that every route's seat count matches its bookings.
    pub fn check_integrity(&self) -> IntegrityReport {
        build_integrity_report(self.routes.values(), &self.bookings)
    }
}
