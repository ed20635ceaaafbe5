use fuel_ledger::config::Config;
use fuel_ledger::ledger::{FuelLedger, LedgerError};
use fuel_ledger::observability;
use fuel_ledger::readings::FillUpInput;
use fuel_ledger::report;
use fuel_ledger::session::{self, Session, SessionError};
use tracing::info;

use crate::cli::{Cli, Commands, FillUpArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Level used while the configuration itself is being loaded
const DEFAULT_LOG_LEVEL: &str = "info";

/// Load configuration, open the ledger, run one command and close the
/// ledger again. Returns `false` when the command was rejected.
pub fn run(cli: Cli) -> Result<bool, AnyError> {
    let log = observability::init(DEFAULT_LOG_LEVEL);

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };
    if let Some(db) = cli.db {
        config.storage.path = db;
    }

    log.set_level(&config.logging.level);

    if let Commands::ShowConfig = cli.command {
        println!("{}", config.to_toml()?);
        return Ok(true);
    }

    let ledger = FuelLedger::open_with(&config.storage.path, config.ledger_options())?;
    let mut session = Session::new(ledger);

    let outcome = execute(&mut session, cli.command);
    session.close()?;

    match outcome {
        Ok(output) => {
            println!("{output}");
            Ok(true)
        }
        Err(err) if is_user_error(err.as_ref()) => {
            eprintln!("{}", report::error_line(err.as_ref()));
            Ok(false)
        }
        Err(err) => Err(err),
    }
}

/// Rejected input is shown inline; anything else is a real failure
fn is_user_error(err: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    if let Some(inner) = err.downcast_ref::<LedgerError>() {
        return inner.is_rejection();
    }
    match err.downcast_ref::<SessionError>() {
        Some(SessionError::Ledger(inner)) => inner.is_rejection(),
        Some(_) => true,
        None => false,
    }
}

fn execute(session: &mut Session, command: Commands) -> Result<String, AnyError> {
    match command {
        Commands::AddVehicle { name } => {
            let vehicle = session.add_vehicle(&name)?;
            Ok(format!("Vehicle {} added (id {})", vehicle.name, vehicle.id))
        }
        Commands::Vehicles => {
            let vehicles = session.ledger().list_vehicles()?;
            Ok(report::vehicle_list(&vehicles))
        }
        Commands::DeleteVehicle { id } => {
            if session.ledger_mut().delete_vehicle(id)? {
                Ok(format!("Vehicle {id} deleted"))
            } else {
                Ok(format!("No vehicle with id {id}"))
            }
        }
        Commands::LastOdometer { vehicle } => {
            session.select(&vehicle)?;
            Ok(format!("{:.2}", session.last_odometer()))
        }
        Commands::FillUp(args) => Ok(fill_up(session, args)?),
        Commands::History { vehicle, json } => {
            let vehicle = session.select(&vehicle)?.clone();
            let records = session.history()?;
            if json {
                Ok(serde_json::to_string_pretty(&records)?)
            } else {
                Ok(report::history(&vehicle, &records))
            }
        }
        Commands::CleanInvalid => {
            let removed = session.ledger_mut().remove_invalid_vehicles()?;
            Ok(format!("{removed} invalid vehicle(s) removed"))
        }
        Commands::Stats => {
            let stats = session.ledger().stats()?;
            Ok(report::stats_line(&stats))
        }
        Commands::ShowConfig => Ok(String::new()),
    }
}

fn fill_up(session: &mut Session, args: FillUpArgs) -> session::Result<String> {
    session.select(&args.vehicle)?;

    let km_last = args
        .last
        .map(|r| r.value())
        .unwrap_or_else(|| session.last_odometer());
    let input = FillUpInput::new(km_last, args.current.value(), args.fuel.value())?;
    let record = session.record(input)?;

    info!(vehicle = %args.vehicle, id = record.id, "Fill-up saved");
    Ok(report::efficiency_line(record.km_per_liter))
}
