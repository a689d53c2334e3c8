//! # Simulation runs
//!
//! Two batch drivers write one CSV row per date:
//!
//! - [`run_simulation`] propagates a fixed [`ElementCatalog`] with a [`KeplerPropagator`], in
//!   either output mode. Invalid element sets produce `nan` cells, never an error.
//! - [`run_logger`] asks a [`LongitudeSource`] for the geocentric longitude of every body on
//!   every date. A failed lookup is logged and written as `nan`.
//!
//! The catalog is built up-front by [`ElementCatalog::fetch`]: the first body whose elements
//! cannot be obtained aborts the whole run, before any row is written.
use std::io::Write;

use camino::Utf8Path;
use hifitime::Epoch;
use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::bodies::Body;
use crate::horizons::{ElementSource, LongitudeSource};
use crate::kepsim_errors::KepsimError;
use crate::orbital_elements::{ElementValidity, OrbitalElementSet};
use crate::output::CsvSink;
use crate::propagator::{KeplerPropagator, OutputMode, PropagationResult};
use crate::time::{format_date, DateRange};

/// Orbital elements of the simulated bodies, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementCatalog {
    entries: Vec<(Body, OrbitalElementSet)>,
}

impl ElementCatalog {
    pub fn new(entries: Vec<(Body, OrbitalElementSet)>) -> Self {
        ElementCatalog { entries }
    }

    /// Fetch the elements of every body of `bodies` at `epoch`, in order.
    ///
    /// Element sets that cannot be propagated are kept (they will produce `nan` columns) but
    /// reported with a warning.
    ///
    /// Return
    /// ------
    /// * The catalog, or the error of the first body that failed.
    pub fn fetch<S: ElementSource + ?Sized>(
        source: &S,
        bodies: &[Body],
        epoch: Epoch,
    ) -> Result<Self, KepsimError> {
        info!(
            "Fetching orbital elements at {} for {}",
            format_date(&epoch),
            bodies.iter().join(", ")
        );

        let entries = bodies
            .iter()
            .map(|&body| {
                let elements = source.fetch_elements(body, epoch)?;
                match elements.validity() {
                    ElementValidity::Valid => debug!("{body}: {elements}"),
                    invalid => warn!("{body}: unusable orbital elements ({invalid:?})"),
                }
                Ok((body, elements))
            })
            .collect::<Result<Vec<_>, KepsimError>>()?;

        Ok(ElementCatalog { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn bodies(&self) -> Vec<Body> {
        self.entries.iter().map(|(body, _)| *body).collect()
    }

    pub fn get(&self, body: Body) -> Option<&OrbitalElementSet> {
        self.entries
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, elements)| elements)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Body, OrbitalElementSet)> {
        self.entries.iter()
    }
}

/// Propagate every body of `catalog` over `dates` and write the results to `sink`.
///
/// The output mode is the one of the sink. The header is written first.
///
/// Return
/// ------
/// * The number of data rows written.
pub fn run_simulation<W: Write>(
    catalog: &ElementCatalog,
    propagator: &KeplerPropagator,
    dates: &DateRange,
    sink: &mut CsvSink<W>,
) -> Result<usize, KepsimError> {
    let mode = sink.mode();
    info!(
        "Propagating {} bodies over {} dates ({mode:?})",
        catalog.len(),
        dates.len()
    );

    sink.write_header(&catalog.bodies())?;

    let mut results = Vec::with_capacity(catalog.len());
    for date in dates {
        results.clear();
        results.extend(
            catalog
                .iter()
                .map(|(_, elements)| propagator.propagate(elements, &date, mode)),
        );
        debug!("{}: {} results", format_date(&date), results.len());
        sink.write_row(&date, &results)?;
    }
    sink.flush()?;

    info!("Simulation complete, {} rows written", dates.len());
    Ok(dates.len())
}

/// Fetch the elements of `bodies` at `epoch`, then propagate them over `dates` into a new CSV
/// file at `path`.
///
/// The file is only created once every element set has been obtained, so a failed fetch
/// leaves no partial output behind.
///
/// Return
/// ------
/// * The number of data rows written.
pub fn run_simulation_to_file<S: ElementSource + ?Sized>(
    source: &S,
    bodies: &[Body],
    epoch: Epoch,
    propagator: &KeplerPropagator,
    dates: &DateRange,
    path: &Utf8Path,
    mode: OutputMode,
) -> Result<usize, KepsimError> {
    let catalog = ElementCatalog::fetch(source, bodies, epoch)?;
    let mut sink = CsvSink::create(path, mode)?;
    let rows = run_simulation(&catalog, propagator, dates, &mut sink)?;
    info!("Wrote {rows} rows to {path}");
    Ok(rows)
}

/// Look up the geocentric longitude of every body of `bodies` on every date of `dates` and write
/// them to `sink`, which must be in [`OutputMode::Longitude`].
///
/// Return
/// ------
/// * The number of data rows written.
pub fn run_logger<S: LongitudeSource + ?Sized, W: Write>(
    source: &S,
    bodies: &[Body],
    dates: &DateRange,
    sink: &mut CsvSink<W>,
) -> Result<usize, KepsimError> {
    if sink.mode() != OutputMode::Longitude {
        return Err(KepsimError::InvalidParameter(
            "the longitude logger writes longitude files only".into(),
        ));
    }
    info!(
        "Logging geocentric longitudes of {} bodies over {} dates",
        bodies.len(),
        dates.len()
    );

    sink.write_header(bodies)?;

    for date in dates {
        debug!("Processing {}", format_date(&date));
        let row: Vec<PropagationResult> = bodies
            .iter()
            .map(|&body| match source.geocentric_longitude(body, date) {
                Ok(longitude) => PropagationResult::Longitude(longitude),
                Err(err) => {
                    warn!("{body} on {}: {err}", format_date(&date));
                    PropagationResult::invalid(OutputMode::Longitude)
                }
            })
            .collect();
        sink.write_row(&date, &row)?;
    }
    sink.flush()?;

    info!("Logging complete, {} rows written", dates.len());
    Ok(dates.len())
}

#[cfg(test)]
mod simulation_test {
    use super::*;
    use std::collections::HashMap;

    use crate::time::parse_date;

    fn catalog_source(epoch: Epoch) -> HashMap<Body, OrbitalElementSet> {
        HashMap::from([
            (
                Body::Earth,
                OrbitalElementSet::new(0.0167, 1.0, 0.0, 0.0, 102.9, 100.5, epoch),
            ),
            (
                Body::Mars,
                OrbitalElementSet::new(0.0935, 1.5237, 1.85, 49.56, 286.5, 19.41, epoch),
            ),
            (
                Body::Pluto,
                OrbitalElementSet::new(0.25, 0.0, 17.1, 110.3, 113.8, 14.5, epoch),
            ),
        ])
    }

    #[test]
    fn test_fetch_keeps_order() {
        let epoch = parse_date("2000-01-01").unwrap();
        let source = catalog_source(epoch);
        let catalog =
            ElementCatalog::fetch(&source, &[Body::Pluto, Body::Earth, Body::Mars], epoch)
                .unwrap();
        assert_eq!(catalog.bodies(), vec![Body::Pluto, Body::Earth, Body::Mars]);
        assert_eq!(catalog.get(Body::Mars).unwrap().semi_major_axis, 1.5237);
        assert!(catalog.get(Body::Venus).is_none());
    }

    #[test]
    fn test_catalog_from_entries() {
        let epoch = parse_date("2000-01-01").unwrap();
        let source = catalog_source(epoch);
        let catalog = ElementCatalog::new(vec![
            (Body::Mars, source[&Body::Mars].clone()),
            (Body::Earth, source[&Body::Earth].clone()),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog,
            ElementCatalog::fetch(&source, &[Body::Mars, Body::Earth], epoch).unwrap()
        );
        assert!(ElementCatalog::new(Vec::new()).is_empty());
    }

    #[test]
    fn test_fetch_aborts_on_first_failure() {
        let epoch = parse_date("2000-01-01").unwrap();
        let source = catalog_source(epoch);
        assert_eq!(
            ElementCatalog::fetch(&source, &[Body::Earth, Body::Venus, Body::Mars], epoch),
            Err(KepsimError::UnknownBody("Venus".into()))
        );
    }

    #[test]
    fn test_run_simulation_longitudes() {
        let epoch = parse_date("2000-01-01").unwrap();
        let source = catalog_source(epoch);
        let catalog =
            ElementCatalog::fetch(&source, &[Body::Earth, Body::Pluto], epoch).unwrap();
        let dates = DateRange::from_count(epoch, 2, 100.0).unwrap();

        let mut sink = CsvSink::from_writer(Vec::new(), OutputMode::Longitude);
        let rows =
            run_simulation(&catalog, &KeplerPropagator::default(), &dates, &mut sink).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "Date,Earth,Pluto\n2000-01-01,205.2742,nan\n2000-04-10,301.3497,nan\n"
        );
    }

    #[test]
    fn test_run_simulation_empty_range() {
        let epoch = parse_date("2000-01-01").unwrap();
        let catalog = ElementCatalog::fetch(&catalog_source(epoch), &[Body::Mars], epoch).unwrap();
        let dates = DateRange::new(epoch, parse_date("1999-12-31").unwrap(), 1.0).unwrap();

        let mut sink = CsvSink::from_writer(Vec::new(), OutputMode::Position);
        let rows =
            run_simulation(&catalog, &KeplerPropagator::default(), &dates, &mut sink).unwrap();
        assert_eq!(rows, 0);
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(text, "Date,Mars_x,Mars_y,Mars_z\n");
    }

    struct FlakySource;

    impl LongitudeSource for FlakySource {
        fn geocentric_longitude(&self, body: Body, _date: Epoch) -> Result<f64, KepsimError> {
            match body {
                Body::Moon => Err(KepsimError::MissingEphemerisBlock("Moon".into())),
                _ => Ok(123.456789),
            }
        }
    }

    #[test]
    fn test_run_logger_writes_nan_on_failure() {
        let start = parse_date("2024-02-28").unwrap();
        let dates = DateRange::from_count(start, 2, 1.0).unwrap();

        let mut sink = CsvSink::from_writer(Vec::new(), OutputMode::Longitude);
        let rows = run_logger(&FlakySource, &[Body::Sun, Body::Moon], &dates, &mut sink).unwrap();
        assert_eq!(rows, 2);

        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "Date,Sun,Moon\n2024-02-28,123.4568,nan\n2024-02-29,123.4568,nan\n"
        );
    }

    #[test]
    fn test_run_logger_rejects_position_sink() {
        let start = parse_date("2024-02-28").unwrap();
        let dates = DateRange::from_count(start, 1, 1.0).unwrap();
        let mut sink = CsvSink::from_writer(Vec::new(), OutputMode::Position);
        assert!(matches!(
            run_logger(&FlakySource, &[Body::Sun], &dates, &mut sink),
            Err(KepsimError::InvalidParameter(_))
        ));
    }
}
