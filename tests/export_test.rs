mod common;

use anyhow::Result;
use busbook::io::{load_routes_file, Exporter};
use busbook::BookingLedger;
use common::{run_script, seeded_ledger};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_export_bookings_csv() -> Result<()> {
    let mut ledger = seeded_ledger();
    ledger.create_booking(1, "Ali", 5)?;
    ledger.create_booking(2, "Sara Khan", 2)?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&ledger).export_bookings_csv(&mut buffer)?;
    assert_eq!(count, 2);

    let mut reader = csv::Reader::from_reader(buffer.as_slice());
    let headers = reader.headers()?.clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec![
            "id",
            "name",
            "route_id",
            "route",
            "departure",
            "seats",
            "total_fare",
            "booked_at"
        ]
    );

    let rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
    assert_eq!(&rows[0][1], "Ali");
    assert_eq!(&rows[0][3], "north nazimabad - power house");
    assert_eq!(&rows[0][4], "09:00 AM");
    assert_eq!(&rows[0][6], "2500");
    assert_eq!(&rows[1][1], "Sara Khan");
    assert_eq!(&rows[1][6], "1400");

    Ok(())
}

#[test]
fn test_export_routes_json_reflects_bookings() -> Result<()> {
    let mut ledger = seeded_ledger();
    ledger.create_booking(3, "Omar", 4)?;

    let mut buffer = Vec::new();
    let count = Exporter::new(&ledger).export_routes_json(&mut buffer)?;
    assert_eq!(count, 3);

    let routes: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(routes[2]["id"], 3);
    assert_eq!(routes[2]["departure"], "05:00 PM");
    assert_eq!(routes[2]["seats_available"], 26);
    assert_eq!(routes[2]["capacity"], 30);

    Ok(())
}

#[test]
fn test_export_session_snapshot() -> Result<()> {
    let mut ledger = seeded_ledger();
    ledger.create_booking(1, "Ali", 1)?;

    let mut buffer = Vec::new();
    let snapshot = Exporter::new(&ledger).export_session_json(&mut buffer)?;
    assert_eq!(snapshot.routes.len(), 3);
    assert_eq!(snapshot.bookings.len(), 1);

    let parsed: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(parsed["bookings"][0]["name"], "Ali");
    assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));

    Ok(())
}

#[test]
fn test_session_export_to_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("bookings.json");

    let script = format!(
        "book 2 3 Sara\nexport bookings --format json --output {}\n",
        path.display()
    );
    let (output, _) = run_script(seeded_ledger(), &script)?;
    assert!(output.contains("Exported 1 bookings to"));

    let bookings: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(bookings[0]["name"], "Sara");
    assert_eq!(bookings[0]["total_fare"], 2100);

    Ok(())
}

#[test]
fn test_session_export_to_missing_directory_reports_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("missing").join("routes.csv");

    let script = format!("export routes --output {}\nroutes\n", path.display());
    let (output, _) = run_script(seeded_ledger(), &script)?;

    assert!(output.contains("Error: Failed to create output file"));
    assert!(output.contains("Available Bus Schedules"));

    Ok(())
}

#[test]
fn test_load_routes_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("routes.json");
    fs::write(
        &path,
        r#"[
            {"id": 1, "description": "saddar - clifton", "departure": "07:30 AM", "fare": 250, "seats": 4},
            {"id": 2, "description": "malir - tower", "departure": "6:00 pm", "fare": 400, "seats": 2}
        ]"#,
    )?;

    let mut ledger = BookingLedger::with_routes(load_routes_file(&path)?)?;
    assert_eq!(ledger.create_booking(2, "Hina", 2)?.booking.total_fare, 800);
    assert!(ledger.create_booking(2, "Bilal", 1).is_err());

    Ok(())
}

#[test]
fn test_load_routes_file_missing() {
    let result = load_routes_file(std::path::Path::new("/nonexistent/routes.json"));
    let err = result.expect_err("missing file should fail");
    assert!(err.to_string().contains("Failed to open route file"));
}

#[test]
fn test_session_rejected_export_creates_no_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("session.csv");

    let script = format!("export session --format csv --output {}\n", path.display());
    let (output, _) = run_script(seeded_ledger(), &script)?;

    assert!(output.contains("Error: session exports are JSON only"));
    assert!(!path.exists());

    Ok(())
}
