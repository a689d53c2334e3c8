use camino::Utf8PathBuf;
use hifitime::Epoch;

use kepsim::bodies::{Body, SIMULATED_BODIES};
use kepsim::horizons::LongitudeSource;
use kepsim::kepsim_errors::KepsimError;
use kepsim::orbital_elements::EccentricityPolicy;
use kepsim::output::CsvSink;
use kepsim::propagator::{KeplerPropagator, OutputMode, PropagatorParams};
use kepsim::simulation::{run_logger, run_simulation, run_simulation_to_file, ElementCatalog};
use kepsim::time::{parse_date, DateRange};

mod common;
use common::element_table;

fn temp_csv(name: &str) -> Utf8PathBuf {
    let dir = Utf8PathBuf::from_path_buf(std::env::temp_dir()).unwrap();
    dir.join(format!("kepsim_{}_{name}.csv", std::process::id()))
}

#[test]
fn test_position_file() {
    let epoch = parse_date("2000-01-01").unwrap();
    let table = element_table(epoch);
    let catalog = ElementCatalog::fetch(&table, &[Body::Mars, Body::Pluto], epoch).unwrap();
    let dates = DateRange::new(epoch, parse_date("2000-01-03").unwrap(), 1.0).unwrap();

    let path = temp_csv("position");
    let mut sink = CsvSink::create(&path, OutputMode::Position).unwrap();
    let rows = run_simulation(&catalog, &KeplerPropagator::default(), &dates, &mut sink).unwrap();
    drop(sink);
    assert_eq!(rows, 3);

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Mars_x,Mars_y,Mars_z,Pluto_x,Pluto_y,Pluto_z"
    );
    assert_eq!(lines[1], "2000-01-01,1.390537,-0.012604,-0.034448,nan,nan,nan");
    assert!(lines[2].starts_with("2000-01-02,"));
    assert!(lines[3].starts_with("2000-01-03,"));
    assert_eq!(lines.len(), 4);
}

#[test]
fn test_fetch_failure_creates_no_file() {
    let epoch = parse_date("2000-01-01").unwrap();
    let table = element_table(epoch);
    let dates = DateRange::from_count(epoch, 5, 1.0).unwrap();
    let path = temp_csv("fetch_failure");
    let _ = std::fs::remove_file(&path);

    // the table has no Mercury, which is the first simulated body
    assert_eq!(
        run_simulation_to_file(
            &table,
            &SIMULATED_BODIES,
            epoch,
            &KeplerPropagator::default(),
            &dates,
            &path,
            OutputMode::Longitude,
        ),
        Err(KepsimError::UnknownBody("Mercury".into()))
    );
    assert!(!path.exists());
}

#[test]
fn test_simulation_to_file() {
    let epoch = parse_date("2000-01-01").unwrap();
    let table = element_table(epoch);
    let dates = DateRange::from_count(epoch, 2, 100.0).unwrap();
    let path = temp_csv("to_file");

    let rows = run_simulation_to_file(
        &table,
        &[Body::Earth],
        epoch,
        &KeplerPropagator::default(),
        &dates,
        &path,
        OutputMode::Longitude,
    )
    .unwrap();
    assert_eq!(rows, 2);

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(text, "Date,Earth\n2000-01-01,205.2742\n2000-04-10,301.3497\n");
}

#[test]
fn test_strict_eccentricity_blanks_hyperbolic_columns() {
    let epoch = parse_date("2000-01-01").unwrap();
    let mut table = element_table(epoch);
    if let Some(mars) = table.get_mut(&Body::Mars) {
        mars.eccentricity = 1.3;
    }
    let catalog = ElementCatalog::fetch(&table, &[Body::Earth, Body::Mars], epoch).unwrap();
    let dates = DateRange::from_count(epoch, 1, 1.0).unwrap();

    let propagator = KeplerPropagator::new(
        PropagatorParams::builder()
            .eccentricity_policy(EccentricityPolicy::Strict)
            .build()
            .unwrap(),
    );
    let mut sink = CsvSink::from_writer(Vec::new(), OutputMode::Longitude);
    run_simulation(&catalog, &propagator, &dates, &mut sink).unwrap();

    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert_eq!(text, "Date,Earth,Mars\n2000-01-01,205.2742,nan\n");
}

/// Longitude source that advances every body by one degree per day from a fixed date.
struct LinearSky {
    origin: Epoch,
}

impl LongitudeSource for LinearSky {
    fn geocentric_longitude(&self, body: Body, date: Epoch) -> Result<f64, KepsimError> {
        if body == Body::Pluto {
            return Err(KepsimError::MissingVectorComponent {
                body: body.to_string(),
                component: "X".into(),
            });
        }
        let days = date.to_mjd_utc_days() - self.origin.to_mjd_utc_days();
        Ok((358.5 + days).rem_euclid(360.0))
    }
}

#[test]
fn test_logger_file() {
    let start = parse_date("2023-12-31").unwrap();
    let dates = DateRange::from_count(start, 3, 1.0).unwrap();
    let source = LinearSky { origin: start };

    let path = temp_csv("logger");
    let mut sink = CsvSink::create(&path, OutputMode::Longitude).unwrap();
    let rows = run_logger(&source, &[Body::Sun, Body::Pluto], &dates, &mut sink).unwrap();
    drop(sink);
    assert_eq!(rows, 3);

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(
        text,
        "Date,Sun,Pluto\n2023-12-31,358.5000,nan\n2024-01-01,359.5000,nan\n2024-01-02,0.5000,nan\n"
    );
}
