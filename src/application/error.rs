use thiserror::Error;

use crate::domain::{RouteId, Rupees, SeatRequestError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Route not found: {0}")]
    RouteNotFound(RouteId),

    #[error("Not enough seats available on route {route_id}: requested {requested}, available {available}")]
    InsufficientSeats {
        route_id: RouteId,
        requested: u32,
        available: u32,
    },

    #[error("Invalid seat count: {0} (at least one seat is required)")]
    InvalidSeatCount(u32),

    #[error("Total fare overflows for {seats} seats at fare {fare}")]
    FareOverflow { seats: u32, fare: Rupees },

    #[error("No booking found for {0}")]
    BookingNotFound(String),

    #[error("No bookings found to cancel")]
    EmptyLedger,

    #[error("Duplicate route id: {0}")]
    DuplicateRoute(RouteId),

    #[error("Invalid route table: {0}")]
    InvalidRouteTable(String),
}

impl LedgerError {
    /// Not-found outcomes are reported as information rather than failure;
    /// the caller asked about something that simply isn't there.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            LedgerError::BookingNotFound(_) | LedgerError::EmptyLedger
        )
    }

    pub(crate) fn from_seat_request(route_id: RouteId, err: SeatRequestError) -> Self {
        match err {
            SeatRequestError::ZeroSeats => LedgerError::InvalidSeatCount(0),
            SeatRequestError::InsufficientSeats {
                available,
                requested,
            } => LedgerError::InsufficientSeats {
                route_id,
                requested,
                available,
            },
            SeatRequestError::FareOverflow { seats, fare } => {
                LedgerError::FareOverflow { seats, fare }
            }
        }
    }
}
