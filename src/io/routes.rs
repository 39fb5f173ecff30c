use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::domain::{parse_departure, Route, RouteId, Rupees};

/// One entry of a route table file.
///
/// ```json
/// [{ "id": 1, "description": "kda - gulshan", "departure": "12:00 PM", "fare": 700, "seats": 30 }]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntry {
    pub id: RouteId,
    pub description: String,
    pub departure: String,
    pub fare: Rupees,
    pub seats: u32,
}

impl RouteEntry {
    pub fn into_route(self) -> Result<Route> {
        let departure = parse_departure(&self.departure)
            .with_context(|| format!("Invalid departure for route {}", self.id))?;
        Ok(Route::new(
            self.id,
            self.description,
            departure,
            self.fare,
            self.seats,
        ))
    }
}

/// Read a route table from JSON.
pub fn load_routes<R: Read>(reader: R) -> Result<Vec<Route>> {
    let entries: Vec<RouteEntry> =
        serde_json::from_reader(reader).context("Failed to parse route table JSON")?;

    entries.into_iter().map(RouteEntry::into_route).collect()
}

/// Read a route table from a JSON file.
pub fn load_routes_file(path: &Path) -> Result<Vec<Route>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open route file: {}", path.display()))?;
    load_routes(BufReader::new(file))
        .with_context(|| format!("Failed to load routes from {}", path.display()))
}
