//! # Two-body Keplerian propagation
//!
//! [`KeplerPropagator`] maps an [`OrbitalElementSet`] and a target date to either an ecliptic
//! longitude or a heliocentric ecliptic position. Each evaluation is independent: the propagator
//! holds nothing but its [`PropagatorParams`], so one instance can be shared by reference across
//! threads, bodies and dates.
//!
//! ## Algorithm
//!
//! 1. Mean anomaly at the target date: `M = (M₀ + n·Δt) mod 360` with `n = 360 / (a^1.5 · 365.25)`
//!    degrees per day and `Δt` the days elapsed since the epoch of the elements.
//! 2. Eccentric anomaly `E` from Kepler's equation `M = E − e·sin(E)` (see [`KeplerSolver`]).
//! 3. Orbital-plane coordinates `x = a(cos E − e)`, `y = a·√(1 − e²)·sin E`.
//! 4. Rotation into the heliocentric ecliptic frame by ω, Ω and i ([`perifocal_to_ecliptic`]).
//! 5. Output selection: `atan2(y, x)` in `[0, 360)` degrees, or the `(x, y, z)` vector in AU.
//!
//! Both output modes share steps 1 to 4.
//!
//! ## Invalid elements
//!
//! Element sets rejected by [`OrbitalElementSet::is_valid`] never produce an error: every output
//! field is `NaN`, and callers are expected to check [`PropagationResult::is_nan`].
use hifitime::Epoch;
use nalgebra::{Matrix3, Vector3};

use crate::{
    constants::{AstronomicalUnit, Degree, Radian, FULL_TURN_DEG, RADEG},
    kepler::{principal_degrees, KeplerSolver},
    kepsim_errors::KepsimError,
    orbital_elements::{EccentricityPolicy, OrbitalElementSet},
    time::{DateIter, DateRange},
};

/// Shape of the propagation output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Heliocentric ecliptic longitude in degrees.
    Longitude,
    /// Heliocentric ecliptic position in AU.
    Position,
}

/// Output of one propagation for one (body, date) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropagationResult {
    /// Longitude in degrees, in `[0, 360)` (or `NaN`).
    Longitude(Degree),
    /// `(x, y, z)` in AU, heliocentric ecliptic frame (or `NaN` components).
    Position(Vector3<f64>),
}

impl PropagationResult {
    /// The result reported for an invalid element set: `NaN` in every field.
    pub fn invalid(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Longitude => PropagationResult::Longitude(f64::NAN),
            OutputMode::Position => PropagationResult::Position(Vector3::repeat(f64::NAN)),
        }
    }

    pub fn mode(&self) -> OutputMode {
        match self {
            PropagationResult::Longitude(_) => OutputMode::Longitude,
            PropagationResult::Position(_) => OutputMode::Position,
        }
    }

    /// Output fields in order: the longitude alone, or `x`, `y`, `z`.
    pub fn components(&self) -> &[f64] {
        match self {
            PropagationResult::Longitude(lon) => std::slice::from_ref(lon),
            PropagationResult::Position(pos) => pos.as_slice(),
        }
    }

    /// True if any output field is `NaN`.
    pub fn is_nan(&self) -> bool {
        self.components().iter().any(|v| v.is_nan())
    }

    pub fn longitude(&self) -> Option<Degree> {
        match self {
            PropagationResult::Longitude(lon) => Some(*lon),
            PropagationResult::Position(_) => None,
        }
    }

    pub fn position(&self) -> Option<&Vector3<f64>> {
        match self {
            PropagationResult::Longitude(_) => None,
            PropagationResult::Position(pos) => Some(pos),
        }
    }
}

/// Intermediate state of one evaluation, before the rotation out of the orbital plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalPlaneState {
    /// Mean anomaly at the target date, degrees in `[0, 360)`.
    pub mean_anomaly: Degree,
    pub eccentric_anomaly: Radian,
    /// Coordinate along the periapsis direction (AU).
    pub x: AstronomicalUnit,
    /// Coordinate 90° ahead of periapsis in the orbital plane (AU).
    pub y: AstronomicalUnit,
}

impl OrbitalPlaneState {
    /// Heliocentric distance (AU).
    pub fn radius(&self) -> AstronomicalUnit {
        self.x.hypot(self.y)
    }
}

/// Rotation matrix from the orbital (perifocal) frame to the heliocentric ecliptic frame.
///
/// Built from the argument of periapsis ω, the longitude of the ascending node Ω and the
/// inclination i of `elements`, i.e. `R_z(Ω) · R_x(i) · R_z(ω)`.
pub fn perifocal_to_ecliptic(elements: &OrbitalElementSet) -> Matrix3<f64> {
    let (sin_w, cos_w) = (elements.periapsis_argument * RADEG).sin_cos();
    let (sin_n, cos_n) = (elements.ascending_node_longitude * RADEG).sin_cos();
    let (sin_i, cos_i) = (elements.inclination * RADEG).sin_cos();

    Matrix3::new(
        cos_w * cos_n - sin_w * sin_n * cos_i,
        -(sin_w * cos_n + cos_w * sin_n * cos_i),
        sin_n * sin_i,
        cos_w * sin_n + sin_w * cos_n * cos_i,
        -sin_w * sin_n + cos_w * cos_n * cos_i,
        -cos_n * sin_i,
        sin_w * sin_i,
        cos_w * sin_i,
        cos_i,
    )
}

/// Longitude of the `(x, y)` direction in degrees, in `[0, 360)`.
pub fn ecliptic_longitude(x: f64, y: f64) -> Degree {
    let mut longitude = y.atan2(x).to_degrees();
    if longitude < 0.0 {
        longitude += FULL_TURN_DEG;
    }
    // -1e-15 + 360 rounds to 360
    if longitude >= FULL_TURN_DEG {
        longitude = 0.0;
    }
    longitude
}

/// Configuration of a [`KeplerPropagator`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropagatorParams {
    pub solver: KeplerSolver,
    pub eccentricity_policy: EccentricityPolicy,
}

impl PropagatorParams {
    pub fn builder() -> PropagatorParamsBuilder {
        PropagatorParamsBuilder::new()
    }
}

/// Builder for [`PropagatorParams`], with validation.
#[derive(Debug, Clone, Default)]
pub struct PropagatorParamsBuilder {
    params: PropagatorParams,
}

impl PropagatorParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solver(mut self, v: KeplerSolver) -> Self {
        self.params.solver = v;
        self
    }

    pub fn eccentricity_policy(mut self, v: EccentricityPolicy) -> Self {
        self.params.eccentricity_policy = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Return
    /// ------
    /// * [`KepsimError::InvalidParameter`] if the solver would take no step at all, or if a
    ///   convergence tolerance is not strictly positive.
    pub fn build(self) -> Result<PropagatorParams, KepsimError> {
        match self.params.solver {
            KeplerSolver::FixedIterations(0) => {
                return Err(KepsimError::InvalidParameter(
                    "solver iterations must be >= 1".into(),
                ));
            }
            KeplerSolver::Converged {
                tolerance,
                max_iterations,
            } => {
                if !(tolerance > 0.0) {
                    return Err(KepsimError::InvalidParameter(
                        "solver tolerance must be > 0".into(),
                    ));
                }
                if max_iterations == 0 {
                    return Err(KepsimError::InvalidParameter(
                        "solver max_iterations must be >= 1".into(),
                    ));
                }
            }
            KeplerSolver::FixedIterations(_) => {}
        }
        Ok(self.params)
    }
}

/// Stateless Keplerian propagator.
#[derive(Debug, Clone, Default)]
pub struct KeplerPropagator {
    params: PropagatorParams,
}

impl KeplerPropagator {
    pub fn new(params: PropagatorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PropagatorParams {
        &self.params
    }

    /// Orbital-plane state of `elements` after `days_since_epoch` days.
    ///
    /// Return
    /// ------
    /// * `None` when the element set is invalid under the configured eccentricity policy.
    pub fn orbital_state(
        &self,
        elements: &OrbitalElementSet,
        days_since_epoch: f64,
    ) -> Option<OrbitalPlaneState> {
        if !elements.is_valid(self.params.eccentricity_policy) {
            return None;
        }

        let a = elements.semi_major_axis;
        let e = elements.eccentricity;

        let mean_anomaly =
            principal_degrees(elements.mean_anomaly + elements.mean_motion() * days_since_epoch);
        let eccentric_anomaly = self.params.solver.solve(mean_anomaly * RADEG, e);

        Some(OrbitalPlaneState {
            mean_anomaly,
            eccentric_anomaly,
            x: a * (eccentric_anomaly.cos() - e),
            y: a * (1.0 - e * e).sqrt() * eccentric_anomaly.sin(),
        })
    }

    /// Heliocentric ecliptic position after `days_since_epoch` days, `None` for invalid elements.
    fn ecliptic_position(
        &self,
        elements: &OrbitalElementSet,
        days_since_epoch: f64,
    ) -> Option<Vector3<f64>> {
        let state = self.orbital_state(elements, days_since_epoch)?;
        Some(perifocal_to_ecliptic(elements) * Vector3::new(state.x, state.y, 0.0))
    }

    /// Propagate `elements` by `days_since_epoch` days.
    pub fn propagate_days(
        &self,
        elements: &OrbitalElementSet,
        days_since_epoch: f64,
        mode: OutputMode,
    ) -> PropagationResult {
        let Some(position) = self.ecliptic_position(elements, days_since_epoch) else {
            return PropagationResult::invalid(mode);
        };

        match mode {
            OutputMode::Longitude => {
                PropagationResult::Longitude(ecliptic_longitude(position.x, position.y))
            }
            OutputMode::Position => PropagationResult::Position(position),
        }
    }

    /// Propagate `elements` to the date `target`.
    pub fn propagate(
        &self,
        elements: &OrbitalElementSet,
        target: &Epoch,
        mode: OutputMode,
    ) -> PropagationResult {
        self.propagate_days(elements, elements.days_since_epoch(target), mode)
    }

    /// Heliocentric ecliptic longitude (degrees) at `target`, `NaN` for invalid elements.
    pub fn longitude(&self, elements: &OrbitalElementSet, target: &Epoch) -> Degree {
        self.ecliptic_position(elements, elements.days_since_epoch(target))
            .map_or(f64::NAN, |pos| ecliptic_longitude(pos.x, pos.y))
    }

    /// Heliocentric ecliptic position (AU) at `target`, `NaN` components for invalid elements.
    pub fn position(&self, elements: &OrbitalElementSet, target: &Epoch) -> Vector3<f64> {
        self.ecliptic_position(elements, elements.days_since_epoch(target))
            .unwrap_or_else(|| Vector3::repeat(f64::NAN))
    }

    /// Lazily propagate `elements` over every date of `dates`, in chronological order.
    ///
    /// The returned iterator is `Clone`: cloning it (or calling this method again) restarts the
    /// sequence without re-deriving any date.
    pub fn propagate_range<'a>(
        &'a self,
        elements: &'a OrbitalElementSet,
        dates: &DateRange,
        mode: OutputMode,
    ) -> PropagationRange<'a> {
        PropagationRange {
            propagator: self,
            elements,
            dates: dates.iter(),
            mode,
        }
    }
}

/// Iterator returned by [`KeplerPropagator::propagate_range`].
#[derive(Debug, Clone)]
pub struct PropagationRange<'a> {
    propagator: &'a KeplerPropagator,
    elements: &'a OrbitalElementSet,
    dates: DateIter,
    mode: OutputMode,
}

impl Iterator for PropagationRange<'_> {
    type Item = (Epoch, PropagationResult);

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.dates.next()?;
        let result = self.propagator.propagate(self.elements, &date, self.mode);
        Some((date, result))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.dates.size_hint()
    }
}

impl ExactSizeIterator for PropagationRange<'_> {}
