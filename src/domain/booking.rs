use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RouteId, Rupees};

pub type BookingId = Uuid;

/// A passenger's reservation of a number of seats on a route.
/// Bookings are never edited; cancelling removes them outright.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    /// Passenger name, the key cancellations match on
    pub name: String,
    pub route_id: RouteId,
    /// Always at least one
    pub seats: u32,
    /// Seats times the route fare at the moment of booking
    pub total_fare: Rupees,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(name: impl Into<String>, route_id: RouteId, seats: u32, total_fare: Rupees) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            route_id,
            seats,
            total_fare,
            booked_at: Utc::now(),
        }
    }

    pub fn is_for(&self, name: &str) -> bool {
        self.name == name
    }
}
