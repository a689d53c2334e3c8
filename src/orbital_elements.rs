//! # Orbital element sets
//!
//! This module defines [`OrbitalElementSet`], the six classical Keplerian elements of one body
//! together with the epoch at which they are valid, and the validation rules applied before
//! propagation.
//!
//! ## Units
//!
//! - Lengths: **AU**
//! - Angles: **degrees**, unrestricted range (normalization happens during propagation)
//! - Time: [`hifitime::Epoch`]
//!
//! ## Validity
//!
//! A set whose semi-major axis is not strictly positive (this includes `NaN`) signals an upstream
//! parse failure. Such a set is never rejected at construction: the propagator turns every output
//! of an invalid set into `NaN`, so a batch run over many bodies and dates never aborts halfway.
//!
//! Eccentricity outside `[0, 1)` is reported by [`OrbitalElementSet::validity`] but only makes the
//! set invalid under [`EccentricityPolicy::Strict`]. Under the default
//! [`EccentricityPolicy::Lenient`] such sets still propagate and yield numerically degenerate
//! output.
use hifitime::Epoch;
use std::fmt;

use crate::constants::{AstronomicalUnit, Degree, Kilometer, AU, DAYS_PER_YEAR, FULL_TURN_DEG};
use crate::time::days_between;

/// Outcome of the validation of an [`OrbitalElementSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementValidity {
    Valid,
    /// `a <= 0` or `a` is not a number.
    InvalidSemiMajorAxis,
    /// `e` outside `[0, 1)`: parabolic, hyperbolic or meaningless.
    EccentricityOutOfDomain,
}

/// How eccentricities outside `[0, 1)` are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EccentricityPolicy {
    /// Only a non-positive semi-major axis invalidates a set.
    #[default]
    Lenient,
    /// An out-of-domain eccentricity invalidates a set as well.
    Strict,
}

/// Keplerian orbital elements of one body at a reference epoch.
///
/// Units
/// -----
/// * `eccentricity`: unitless.
/// * `semi_major_axis`: AU.
/// * `inclination`: degrees.
/// * `ascending_node_longitude`: degrees (Ω).
/// * `periapsis_argument`: degrees (ω).
/// * `mean_anomaly`: degrees (M at `epoch`).
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitalElementSet {
    pub eccentricity: f64,
    pub semi_major_axis: AstronomicalUnit,
    pub inclination: Degree,
    pub ascending_node_longitude: Degree,
    pub periapsis_argument: Degree,
    pub mean_anomaly: Degree,
    pub epoch: Epoch,
}

impl OrbitalElementSet {
    pub fn new(
        eccentricity: f64,
        semi_major_axis: AstronomicalUnit,
        inclination: Degree,
        ascending_node_longitude: Degree,
        periapsis_argument: Degree,
        mean_anomaly: Degree,
        epoch: Epoch,
    ) -> Self {
        Self {
            eccentricity,
            semi_major_axis,
            inclination,
            ascending_node_longitude,
            periapsis_argument,
            mean_anomaly,
            epoch,
        }
    }

    /// Build an element set from values as Horizons reports them, with the semi-major axis in km.
    pub fn from_horizons_km(
        eccentricity: f64,
        semi_major_axis_km: Kilometer,
        inclination: Degree,
        ascending_node_longitude: Degree,
        periapsis_argument: Degree,
        mean_anomaly: Degree,
        epoch: Epoch,
    ) -> Self {
        Self::new(
            eccentricity,
            semi_major_axis_km / AU,
            inclination,
            ascending_node_longitude,
            periapsis_argument,
            mean_anomaly,
            epoch,
        )
    }

    /// Check the element set. The semi-major axis is checked first.
    pub fn validity(&self) -> ElementValidity {
        if !(self.semi_major_axis > 0.0) {
            ElementValidity::InvalidSemiMajorAxis
        } else if !(0.0..1.0).contains(&self.eccentricity) {
            ElementValidity::EccentricityOutOfDomain
        } else {
            ElementValidity::Valid
        }
    }

    /// Whether the set can be propagated under the given eccentricity policy.
    pub fn is_valid(&self, policy: EccentricityPolicy) -> bool {
        match (self.validity(), policy) {
            (ElementValidity::Valid, _) => true,
            (ElementValidity::EccentricityOutOfDomain, EccentricityPolicy::Lenient) => true,
            _ => false,
        }
    }

    /// Mean motion in degrees per day, `360 / (a^1.5 · 365.25)`.
    pub fn mean_motion(&self) -> f64 {
        FULL_TURN_DEG / (self.semi_major_axis.powi(3).sqrt() * DAYS_PER_YEAR)
    }

    /// Orbital period in days.
    pub fn period_days(&self) -> f64 {
        FULL_TURN_DEG / self.mean_motion()
    }

    /// Signed number of days elapsed from the epoch of the set to `target`.
    pub fn days_since_epoch(&self, target: &Epoch) -> f64 {
        days_between(&self.epoch, target)
    }
}

impl fmt::Display for OrbitalElementSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Orbital elements @ epoch: {}", self.epoch)?;
        writeln!(f, "-------------------------------------------")?;
        writeln!(
            f,
            "  a   (semi-major axis)       = {:.6} AU",
            self.semi_major_axis
        )?;
        writeln!(
            f,
            "  e   (eccentricity)          = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)           = {:.6}°",
            self.inclination
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)     = {:.6}°",
            self.ascending_node_longitude
        )?;
        writeln!(
            f,
            "  ω   (argument of periapsis) = {:.6}°",
            self.periapsis_argument
        )?;
        writeln!(
            f,
            "  M   (mean anomaly)          = {:.6}°",
            self.mean_anomaly
        )
    }
}
