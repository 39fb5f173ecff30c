use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::application::{BookingLedger, BookingView};
use crate::domain::{format_departure, Route, RouteId, Rupees};

/// A booking as written to CSV/JSON exports
#[derive(Debug, Clone, Serialize)]
pub struct BookingRecord {
    pub id: String,
    pub name: String,
    pub route_id: RouteId,
    pub route: String,
    pub departure: String,
    pub seats: u32,
    pub total_fare: Rupees,
    pub booked_at: DateTime<Utc>,
}

impl From<BookingView> for BookingRecord {
    fn from(view: BookingView) -> Self {
        Self {
            id: view.booking_id.to_string(),
            name: view.name,
            route_id: view.route_id,
            route: view.route_description,
            departure: format_departure(view.departure),
            seats: view.seats,
            total_fare: view.total_fare,
            booked_at: view.booked_at,
        }
    }
}

/// A route as written to CSV/JSON exports
#[derive(Debug, Clone, Serialize)]
pub struct RouteRecord {
    pub id: RouteId,
    pub description: String,
    pub departure: String,
    pub fare: Rupees,
    pub seats_available: u32,
    pub capacity: u32,
}

impl From<Route> for RouteRecord {
    fn from(route: Route) -> Self {
        Self {
            departure: route.departure_label(),
            id: route.id,
            description: route.description,
            fare: route.fare,
            seats_available: route.seats_available,
            capacity: route.capacity,
        }
    }
}

/// Everything a session holds, for a full JSON export
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub routes: Vec<RouteRecord>,
    pub bookings: Vec<BookingRecord>,
}

/// Exporter for writing the current ledger contents out of the session
pub struct Exporter<'a> {
    ledger: &'a BookingLedger,
}

impl<'a> Exporter<'a> {
    pub fn new(ledger: &'a BookingLedger) -> Self {
        Self { ledger }
    }

    fn booking_records(&self) -> Vec<BookingRecord> {
        self.ledger
            .list_bookings()
            .into_iter()
            .map(BookingRecord::from)
            .collect()
    }

    fn route_records(&self) -> Vec<RouteRecord> {
        self.ledger
            .list_routes()
            .into_iter()
            .map(RouteRecord::from)
            .collect()
    }

    /// Export active bookings to CSV format
    pub fn export_bookings_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.booking_records();
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record([
            "id",
            "name",
            "route_id",
            "route",
            "departure",
            "seats",
            "total_fare",
            "booked_at",
        ])?;

        for record in &records {
            csv_writer.write_record([
                record.id.clone(),
                record.name.clone(),
                record.route_id.to_string(),
                record.route.clone(),
                record.departure.clone(),
                record.seats.to_string(),
                record.total_fare.to_string(),
                record.booked_at.to_rfc3339(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(records.len())
    }

    /// Export the route table to CSV format
    pub fn export_routes_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.route_records();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "description",
            "departure",
            "fare",
            "seats_available",
            "capacity",
        ])?;

        for record in &records {
            csv_writer.write_record([
                record.id.to_string(),
                record.description.clone(),
                record.departure.clone(),
                record.fare.to_string(),
                record.seats_available.to_string(),
                record.capacity.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(records.len())
    }

    /// Export active bookings as a JSON array
    pub fn export_bookings_json<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.booking_records();
        write_json(writer, &records)?;
        Ok(records.len())
    }

    /// Export the route table as a JSON array
    pub fn export_routes_json<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.route_records();
        write_json(writer, &records)?;
        Ok(records.len())
    }

    /// Export routes and bookings together as a JSON snapshot
    pub fn export_session_json<W: Write>(&self, writer: W) -> Result<SessionSnapshot> {
        let snapshot = SessionSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            routes: self.route_records(),
            bookings: self.booking_records(),
        };

        write_json(writer, &snapshot)?;
        Ok(snapshot)
    }
}

fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    writer.write_all(json.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
