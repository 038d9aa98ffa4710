//! terraroute - great-circle distances between airports, optionally
//! routed around countries.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use terraroute_core::RouteRequest;
use terraroute_data::{
    AircraftCatalog, AircraftType, AirportDirectory, BorderStore, CountryDirectory,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terraroute_cli::config::Config;
use terraroute_cli::{format_route, RouteService};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file; environment variables override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of <CODE>.geojson border files
    #[arg(long)]
    borders_dir: Option<PathBuf>,

    /// Sub-segment length in km for border crossing tests
    #[arg(long)]
    sample_step_km: Option<f64>,

    /// Per-route timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Distance between two airports
    Distance {
        /// Departure IATA code
        from: String,
        /// Destination IATA code
        to: String,
        /// Country code to avoid (repeatable)
        #[arg(long = "avoid", value_name = "CODE")]
        avoid: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List known airports
    Airports {
        #[arg(long)]
        continent: Option<String>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List known aircraft
    Aircraft {
        /// Exact manufacturer name, e.g. Boeing
        #[arg(long)]
        manufacturer: Option<String>,
        /// ultralight, light, heavy, commercial, cargo or military
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<AircraftType>,
        #[arg(long)]
        json: bool,
    },
    /// List known countries
    Countries {
        #[arg(long)]
        continent: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// List loaded border codes
    Borders,
}

fn init_tracing(json: bool) -> Result<()> {
    // Prefix match: covers terraroute_core, terraroute_data and terraroute_cli.
    let filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive("terraroute=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env(),
    };
    if let Some(dir) = &cli.borders_dir {
        config.borders_dir = dir.clone();
    }
    if let Some(step) = cli.sample_step_km {
        anyhow::ensure!(
            step.is_finite() && step > 0.0,
            "--sample-step-km must be a positive number"
        );
        config.sample_step_km = step;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config.log_json |= cli.json_logs;
    Ok(config)
}

fn load_borders(config: &Config) -> Result<BorderStore> {
    let borders = BorderStore::new();
    if config.borders_dir.is_dir() {
        borders.load_dir(&config.borders_dir).with_context(|| {
            format!("failed to load borders from {}", config.borders_dir.display())
        })?;
    } else {
        tracing::warn!(
            dir = %config.borders_dir.display(),
            "border directory not found, no countries can be avoided"
        );
    }
    Ok(borders)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_tracing(config.log_json)?;

    let borders = load_borders(&config)?;
    let service = RouteService::new(AirportDirectory::seeded(), borders, &config);

    match cli.command {
        Command::Distance {
            from,
            to,
            avoid,
            json,
        } => {
            let request = RouteRequest {
                departure: from,
                destination: to,
                borders: avoid,
            };
            tracing::info!(
                departure = %request.departure,
                destination = %request.destination,
                avoid = ?request.borders,
                "computing route"
            );
            let result = service
                .distance(request.clone())
                .await
                .context("route computation failed")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", format_route(&request, &result));
            }
        }
        Command::Airports {
            continent,
            country,
            json,
        } => {
            let airports = service.airports(continent.as_deref(), country.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&airports)?);
            } else {
                for airport in airports {
                    println!(
                        "{}  {:<45} {}, {} ({})",
                        airport.iata, airport.name, airport.city, airport.country, airport.continent
                    );
                }
            }
        }
        Command::Aircraft {
            manufacturer,
            kind,
            json,
        } => {
            let catalog = AircraftCatalog::seeded();
            let aircraft = catalog.list(manufacturer.as_deref(), kind);
            if json {
                println!("{}", serde_json::to_string_pretty(&aircraft)?);
            } else {
                for a in aircraft {
                    println!(
                        "{:>3}  {:<20} {:<12} {:<11} {} km",
                        a.id, a.name, a.manufacturer, a.kind, a.range
                    );
                }
            }
        }
        Command::Countries { continent, json } => {
            let directory = CountryDirectory::seeded();
            let countries = directory.list(continent.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&countries)?);
            } else {
                for country in countries {
                    println!("{:<4} {:<28} {}", country.code, country.name, country.continent);
                }
            }
        }
        Command::Borders => {
            for code in service.border_codes() {
                println!("{code}");
            }
        }
    }

    Ok(())
}
