use crate::constants::{
    Degree, Radian, FULL_TURN_DEG, KEPLER_ITERATIONS, KEPLER_MAX_ITERATIONS, KEPLER_TOLERANCE,
};

/// Return the principal value of an angle in degrees, in [0, 360).
///
/// Negative inputs are folded back into the range, which differs from a
/// truncated remainder (`%`) that would keep their sign.
pub fn principal_degrees(a: Degree) -> Degree {
    let r = a.rem_euclid(FULL_TURN_DEG);
    if r >= FULL_TURN_DEG {
        0.0
    } else {
        r
    }
}

/// Strategy used to solve Kepler's equation `M = E − e·sin(E)`.
///
/// Variants
/// --------
/// * `FixedIterations(n)`: exactly `n` Newton-Raphson steps starting from `E₀ = M`,
///   with no convergence test. With `n = 10` this reproduces the reference output
///   bit for bit.
/// * `Converged { tolerance, max_iterations }`: Newton-Raphson steps until
///   `|ΔE| < tolerance`, bounded by `max_iterations`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeplerSolver {
    FixedIterations(usize),
    Converged {
        tolerance: f64,
        max_iterations: usize,
    },
}

impl Default for KeplerSolver {
    fn default() -> Self {
        KeplerSolver::FixedIterations(KEPLER_ITERATIONS)
    }
}

impl KeplerSolver {
    /// Tolerance-based solver with the crate defaults.
    pub fn converged() -> Self {
        KeplerSolver::Converged {
            tolerance: KEPLER_TOLERANCE,
            max_iterations: KEPLER_MAX_ITERATIONS,
        }
    }

    /// Solve Kepler's equation for the eccentric anomaly.
    ///
    /// Arguments
    /// ---------
    /// * `mean_anomaly`: mean anomaly `M` (radians).
    /// * `eccentricity`: orbital eccentricity `e`.
    ///
    /// Return
    /// ------
    /// * The eccentric anomaly `E` (radians). No guard is applied for `e = 1`:
    ///   the Newton step divides by `1 − e·cos(E)`, which can then produce
    ///   non-finite values.
    pub fn solve(&self, mean_anomaly: Radian, eccentricity: f64) -> Radian {
        match *self {
            KeplerSolver::FixedIterations(n) => newton_fixed(mean_anomaly, eccentricity, n),
            KeplerSolver::Converged {
                tolerance,
                max_iterations,
            } => newton_converged(mean_anomaly, eccentricity, tolerance, max_iterations).0,
        }
    }
}

#[inline]
fn newton_step(ecc_anomaly: Radian, mean_anomaly: Radian, eccentricity: f64) -> Radian {
    (ecc_anomaly - eccentricity * ecc_anomaly.sin() - mean_anomaly)
        / (1.0 - eccentricity * ecc_anomaly.cos())
}

fn newton_fixed(mean_anomaly: Radian, eccentricity: f64, iterations: usize) -> Radian {
    let mut ecc_anomaly = mean_anomaly;
    for _ in 0..iterations {
        ecc_anomaly -= newton_step(ecc_anomaly, mean_anomaly, eccentricity);
    }
    ecc_anomaly
}

/// Returns the eccentric anomaly and the number of steps actually taken.
fn newton_converged(
    mean_anomaly: Radian,
    eccentricity: f64,
    tolerance: f64,
    max_iterations: usize,
) -> (Radian, usize) {
    let mut ecc_anomaly = mean_anomaly;
    for it in 1..=max_iterations {
        let delta = newton_step(ecc_anomaly, mean_anomaly, eccentricity);
        ecc_anomaly -= delta;
        if delta.abs() < tolerance {
            return (ecc_anomaly, it);
        }
    }
    (ecc_anomaly, max_iterations)
}
