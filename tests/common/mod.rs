#![allow(dead_code)]

use std::collections::HashMap;

use approx::assert_relative_eq;
use hifitime::Epoch;
use nalgebra::Vector3;

use kepsim::bodies::Body;
use kepsim::orbital_elements::OrbitalElementSet;

pub fn j2000_day() -> Epoch {
    Epoch::from_mjd_utc(51544.0)
}

/// Earth-like elements used for the reference scenario.
pub fn earth(epoch: Epoch) -> OrbitalElementSet {
    OrbitalElementSet::new(0.0167, 1.0, 0.0, 0.0, 102.9, 100.5, epoch)
}

pub fn mars(epoch: Epoch) -> OrbitalElementSet {
    OrbitalElementSet::new(0.0935, 1.5237, 1.85, 49.56, 286.5, 19.41, epoch)
}

pub fn circular(semi_major_axis: f64, epoch: Epoch) -> OrbitalElementSet {
    OrbitalElementSet::new(0.0, semi_major_axis, 7.0, 48.3, 29.1, 0.0, epoch)
}

/// In-memory element source with Earth, Mars and a broken Pluto (`a = 0`).
pub fn element_table(epoch: Epoch) -> HashMap<Body, OrbitalElementSet> {
    HashMap::from([
        (Body::Earth, earth(epoch)),
        (Body::Mars, mars(epoch)),
        (
            Body::Pluto,
            OrbitalElementSet::new(0.25, 0.0, 17.1, 110.3, 113.8, 14.5, epoch),
        ),
    ])
}

pub fn assert_vector_close(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}
