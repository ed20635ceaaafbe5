use clap::{Parser, Subcommand};
use std::path::PathBuf;

use fuel_ledger::readings::Reading;

#[derive(Parser, Debug)]
#[command(name = "fuel-ledger")]
#[command(about = "Track fill-ups and fuel efficiency per vehicle", long_about = None)]
pub struct Cli {
    /// Configuration file (overrides FUEL_LEDGER_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger database file (overrides storage.path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a vehicle
    AddVehicle {
        /// Vehicle name, e.g. its licence plate
        name: String,
    },
    /// List registered vehicles
    Vehicles,
    /// Delete a vehicle and all of its fill-ups
    DeleteVehicle {
        id: i64,
    },
    /// Show the odometer reading of the vehicle's last fill-up
    LastOdometer {
        vehicle: String,
    },
    /// Record a fill-up and print the resulting km/L
    FillUp(FillUpArgs),
    /// Show the stored fill-ups of a vehicle
    History {
        vehicle: String,
        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete vehicles with known invalid legacy names
    CleanInvalid,
    /// Show row counts
    Stats,
    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(clap::Args, Debug)]
pub struct FillUpArgs {
    pub vehicle: String,

    /// Odometer now (a decimal comma is accepted)
    #[arg(long)]
    pub current: Reading,

    /// Fuel added in litres
    #[arg(long)]
    pub fuel: Reading,

    /// Odometer at the previous fill-up; defaults to the last stored reading
    #[arg(long)]
    pub last: Option<Reading>,
}
