//! Short text rendering of results and fill-up history

use std::fmt::Write;

use crate::ledger::{FillUp, StoreStats, Vehicle};

pub const EMPTY_HISTORY: &str = "No records found";

/// Result line shown after a fill-up is saved
pub fn efficiency_line(km_per_liter: f64) -> String {
    format!("Average: {km_per_liter:.2} km/L")
}

/// Inline error text; the user corrects the input and resubmits
pub fn error_line(err: &dyn std::error::Error) -> String {
    format!("Error: {err}")
}

pub fn record_block(record: &FillUp) -> String {
    format!(
        "Date: {}\nOdometer at fill-up: {:.2}\nFuel added: {:.2}L\nKm/L: {:.2}",
        record.date, record.km_current, record.fuel, record.km_per_liter
    )
}

/// Read-only history view for one vehicle
pub fn history(vehicle: &Vehicle, records: &[FillUp]) -> String {
    let mut out = format!("Fill-up history: {}\n", vehicle.name);
    if records.is_empty() {
        out.push_str(EMPTY_HISTORY);
        return out;
    }

    let blocks: Vec<String> = records.iter().map(record_block).collect();
    out.push_str(&blocks.join("\n\n"));
    out
}

pub fn vehicle_list(vehicles: &[Vehicle]) -> String {
    if vehicles.is_empty() {
        return "No vehicles registered".to_string();
    }

    let mut out = String::new();
    for vehicle in vehicles {
        let _ = writeln!(out, "{:>4}  {}", vehicle.id, vehicle.name);
    }
    out.pop();
    out
}

pub fn stats_line(stats: &StoreStats) -> String {
    format!(
        "{} vehicle(s), {} fill-up record(s)",
        stats.vehicle_count, stats.record_count
    )
}
