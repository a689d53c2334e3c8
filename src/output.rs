//! CSV result files.
//!
//! One row per date, one column per body (longitude mode) or three columns per body (position
//! mode):
//!
//! ```text
//! Date,Mercury,Venus,Earth
//! 2024-01-01,276.1534,230.0147,100.3512
//! ```
//!
//! ```text
//! Date,Mercury_x,Mercury_y,Mercury_z
//! 2024-01-01,0.051336,-0.457612,-0.042031
//! ```
//!
//! Longitudes are written with 4 decimals, coordinates with 6. Undefined values are written as
//! `nan`.
use std::fs::File;
use std::io::Write;

use camino::Utf8Path;
use hifitime::Epoch;

use crate::bodies::Body;
use crate::kepsim_errors::KepsimError;
use crate::propagator::{OutputMode, PropagationResult};
use crate::time::format_date;

const LONGITUDE_DECIMALS: usize = 4;
const POSITION_DECIMALS: usize = 6;

/// Format a value with a fixed number of decimals, `nan` for NaN.
pub fn format_value(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

/// Column names of a result file, `Date` first.
pub fn header(bodies: &[Body], mode: OutputMode) -> Vec<String> {
    let columns = bodies.iter().flat_map(|body| match mode {
        OutputMode::Longitude => vec![body.to_string()],
        OutputMode::Position => ["x", "y", "z"]
            .iter()
            .map(|axis| format!("{body}_{axis}"))
            .collect(),
    });
    std::iter::once("Date".to_string()).chain(columns).collect()
}

/// Row-oriented CSV writer of propagation results.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    mode: OutputMode,
    rows: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Utf8Path, mode: OutputMode) -> Result<Self, KepsimError> {
        let file = File::create(path)?;
        Ok(Self::from_writer(file, mode))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(writer: W, mode: OutputMode) -> Self {
        CsvSink {
            writer: csv::Writer::from_writer(writer),
            mode,
            rows: 0,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Number of data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn write_header(&mut self, bodies: &[Body]) -> Result<(), KepsimError> {
        self.writer.write_record(header(bodies, self.mode))?;
        Ok(())
    }

    /// Write the results of one date, in body order.
    ///
    /// Return
    /// ------
    /// * [`KepsimError::InvalidParameter`] if a result does not match the mode of the sink.
    pub fn write_row(
        &mut self,
        date: &Epoch,
        results: &[PropagationResult],
    ) -> Result<(), KepsimError> {
        let decimals = match self.mode {
            OutputMode::Longitude => LONGITUDE_DECIMALS,
            OutputMode::Position => POSITION_DECIMALS,
        };

        let mut record = Vec::with_capacity(1 + 3 * results.len());
        record.push(format_date(date));
        for result in results {
            if result.mode() != self.mode {
                return Err(KepsimError::InvalidParameter(format!(
                    "{:?} result written to a {:?} file",
                    result.mode(),
                    self.mode
                )));
            }
            record.extend(
                result
                    .components()
                    .iter()
                    .map(|v| format_value(*v, decimals)),
            );
        }

        self.writer.write_record(&record)?;
        self.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), KepsimError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, KepsimError> {
        self.writer
            .into_inner()
            .map_err(|e| KepsimError::IoError(e.into_error()))
    }
}
