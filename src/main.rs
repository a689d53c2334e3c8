use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};

use kepsim::bodies::{Body, LOGGED_BODIES, SIMULATED_BODIES};
use kepsim::horizons::{HorizonsClient, HorizonsConfig, HORIZONS_API_URL};
use kepsim::kepler::KeplerSolver;
use kepsim::kepsim_errors::KepsimError;
use kepsim::orbital_elements::EccentricityPolicy;
use kepsim::output::CsvSink;
use kepsim::propagator::{KeplerPropagator, OutputMode, PropagatorParams};
use kepsim::simulation::{run_logger, run_simulation_to_file};
use kepsim::time::{parse_date, DateRange};

#[derive(Parser)]
#[command(name = "kepsim")]
#[command(about = "Keplerian solar-system simulator seeded from JPL Horizons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log the raw Horizons responses
    #[arg(long, global = true)]
    debug: bool,

    /// Treat eccentricities outside [0, 1) as invalid elements
    #[arg(long, global = true)]
    strict_eccentricity: bool,

    /// Solve Kepler's equation up to convergence instead of a fixed 10 iterations
    #[arg(long, global = true)]
    converge: bool,

    #[arg(long, global = true, default_value = HORIZONS_API_URL)]
    horizons_url: String,

    /// HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,
}

#[derive(Args)]
struct RangeArgs {
    /// First date, YYYY-MM-DD
    #[arg(long)]
    start: String,

    /// Last date, YYYY-MM-DD (inclusive)
    #[arg(long)]
    end: String,

    /// Epoch of the fetched orbital elements, defaults to the start date
    #[arg(long)]
    epoch: Option<String>,

    #[arg(long, default_value_t = 1.0)]
    step_days: f64,

    /// Bodies to simulate (name or Horizons id), defaults to Mercury to Pluto
    #[arg(long = "body")]
    bodies: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Heliocentric ecliptic longitudes (degrees) from Keplerian propagation
    Longitude {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(short, long, default_value = "kepler_data.csv")]
        output: Utf8PathBuf,
    },

    /// Heliocentric ecliptic positions (AU) from Keplerian propagation
    Position {
        #[command(flatten)]
        range: RangeArgs,

        #[arg(short, long, default_value = "data_3d.csv")]
        output: Utf8PathBuf,
    },

    /// Daily geocentric longitudes looked up directly in Horizons
    Log {
        /// First date, YYYY-MM-DD
        #[arg(long)]
        start: String,

        /// Number of days to log
        #[arg(long)]
        days: usize,

        #[arg(short, long, default_value = "data.csv")]
        output: Utf8PathBuf,

        /// Bodies to log (name or Horizons id), defaults to the Sun, the Moon and the planets
        #[arg(long = "body")]
        bodies: Vec<String>,
    },
}

fn parse_bodies(names: &[String], default: &[Body]) -> Result<Vec<Body>, KepsimError> {
    if names.is_empty() {
        return Ok(default.to_vec());
    }
    names.iter().map(|name| name.parse()).collect()
}

fn simulate(
    cli: &Cli,
    client: &HorizonsClient,
    range: &RangeArgs,
    output: &Utf8PathBuf,
    mode: OutputMode,
) -> Result<(), KepsimError> {
    let start = parse_date(&range.start)?;
    let end = parse_date(&range.end)?;
    let epoch = match &range.epoch {
        Some(epoch) => parse_date(epoch)?,
        None => start,
    };
    let dates = DateRange::new(start, end, range.step_days)?;
    let bodies = parse_bodies(&range.bodies, &SIMULATED_BODIES)?;

    let solver = if cli.converge {
        KeplerSolver::converged()
    } else {
        KeplerSolver::default()
    };
    let policy = if cli.strict_eccentricity {
        EccentricityPolicy::Strict
    } else {
        EccentricityPolicy::Lenient
    };
    let params = PropagatorParams::builder()
        .solver(solver)
        .eccentricity_policy(policy)
        .build()?;

    run_simulation_to_file(
        client,
        &bodies,
        epoch,
        &KeplerPropagator::new(params),
        &dates,
        output,
        mode,
    )?;
    Ok(())
}

fn main() -> Result<(), KepsimError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let client = HorizonsClient::new(HorizonsConfig {
        base_url: cli.horizons_url.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
    });

    match &cli.command {
        Commands::Longitude { range, output } => {
            simulate(&cli, &client, range, output, OutputMode::Longitude)
        }
        Commands::Position { range, output } => {
            simulate(&cli, &client, range, output, OutputMode::Position)
        }
        Commands::Log {
            start,
            days,
            output,
            bodies,
        } => {
            let dates = DateRange::from_count(parse_date(start)?, *days, 1.0)?;
            let bodies = parse_bodies(bodies, &LOGGED_BODIES)?;

            let mut sink = CsvSink::create(output, OutputMode::Longitude)?;
            let rows = run_logger(&client, &bodies, &dates, &mut sink)?;
            info!("Wrote {rows} rows to {output}");
            Ok(())
        }
    }
}
