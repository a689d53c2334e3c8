//! # Date handling
//!
//! Calendar dates are carried as [`hifitime::Epoch`] values. Elapsed time between two epochs is
//! measured in **UTC MJD days**, i.e. calendar days: a leap second inserted between two dates does
//! not turn a one-day step into `1.0000116` days.
//!
//! [`DateRange`] is the lazy date sequence the simulation iterates over. Its `k`-th date is
//! computed directly as `start + k·step`, so long runs do not accumulate rounding drift and the
//! sequence can be restarted at will.
use hifitime::Epoch;
use std::str::FromStr;

use crate::constants::MJD;
use crate::kepsim_errors::KepsimError;

/// Parse a date given as `YYYY-MM-DD` (midnight UTC).
///
/// Any other string is handed to the hifitime parser, so full timestamps such as
/// `2021-01-01T12:00:00 UTC` are accepted as well.
///
/// Return
/// ------
/// * The parsed [`Epoch`], or [`KepsimError::InvalidDate`] if the string is not a date.
pub fn parse_date(date: &str) -> Result<Epoch, KepsimError> {
    let date = date.trim();
    let parts: Vec<&str> = date.split('-').collect();

    if parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
    {
        let invalid = || KepsimError::InvalidDate(date.to_string());
        let year = i32::from_str(parts[0]).map_err(|_| invalid())?;
        let month = u8::from_str(parts[1]).map_err(|_| invalid())?;
        let day = u8::from_str(parts[2]).map_err(|_| invalid())?;
        return Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0)
            .map_err(|_| invalid());
    }

    Epoch::from_str(date).map_err(|_| KepsimError::InvalidDate(date.to_string()))
}

/// Format an epoch as its UTC calendar date, `YYYY-MM-DD`.
pub fn format_date(epoch: &Epoch) -> String {
    let (year, month, day, _, _, _, _) = epoch.to_gregorian_utc();
    format!("{year:04}-{month:02}-{day:02}")
}

/// Signed number of days from `from` to `to` (fractional days allowed).
pub fn days_between(from: &Epoch, to: &Epoch) -> f64 {
    to.to_mjd_utc_days() - from.to_mjd_utc_days()
}

/// Largest number of dates a [`DateRange`] built from two bounds may hold (about 27 000 years of
/// daily dates).
pub const MAX_DATE_RANGE_LEN: usize = 10_000_000;

/// A finite, evenly spaced sequence of dates.
///
/// The range is a plain value: iterating it does not consume it, and every call to
/// [`DateRange::iter`] starts again from the first date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    start_mjd: MJD,
    step_days: f64,
    len: usize,
}

impl DateRange {
    /// Dates from `start` to `end` (inclusive when reachable) every `step_days` days.
    ///
    /// An `end` before `start` yields an empty range.
    ///
    /// Return
    /// ------
    /// * [`KepsimError::InvalidParameter`] if `step_days` is not a strictly positive finite number,
    ///   or if the range would hold more than [`MAX_DATE_RANGE_LEN`] dates.
    pub fn new(start: Epoch, end: Epoch, step_days: f64) -> Result<Self, KepsimError> {
        Self::check_step(step_days)?;

        let span = days_between(&start, &end);
        let len = if span < 0.0 {
            0
        } else {
            // tolerate rounding on spans that are an exact multiple of the step
            let count = (span / step_days + 1e-9).floor() + 1.0;
            if !(count <= MAX_DATE_RANGE_LEN as f64) {
                return Err(KepsimError::InvalidParameter(format!(
                    "{span} days every {step_days} days exceeds {MAX_DATE_RANGE_LEN} dates"
                )));
            }
            count as usize
        };

        Ok(DateRange {
            start_mjd: start.to_mjd_utc_days(),
            step_days,
            len,
        })
    }

    /// `count` dates starting at `start`, every `step_days` days.
    pub fn from_count(start: Epoch, count: usize, step_days: f64) -> Result<Self, KepsimError> {
        Self::check_step(step_days)?;
        Ok(DateRange {
            start_mjd: start.to_mjd_utc_days(),
            step_days,
            len: count,
        })
    }

    fn check_step(step_days: f64) -> Result<(), KepsimError> {
        if !(step_days.is_finite() && step_days > 0.0) {
            return Err(KepsimError::InvalidParameter(format!(
                "step_days must be > 0, got {step_days}"
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn step_days(&self) -> f64 {
        self.step_days
    }

    /// The `index`-th date of the range, if any.
    pub fn get(&self, index: usize) -> Option<Epoch> {
        (index < self.len)
            .then(|| Epoch::from_mjd_utc(self.start_mjd + index as f64 * self.step_days))
    }

    pub fn iter(&self) -> DateIter {
        DateIter {
            range: *self,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for &'a DateRange {
    type Item = Epoch;
    type IntoIter = DateIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the dates of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct DateIter {
    range: DateRange,
    next: usize,
}

impl Iterator for DateIter {
    type Item = Epoch;

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.range.get(self.next)?;
        self.next += 1;
        Some(date)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.len.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateIter {}
