//! # Constants and type definitions for kepsim
//!
//! This module centralizes the **physical constants**, **conversion factors** and
//! **common type aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, AU ↔ km)
//! - The fixed normalization of the mean motion (one AU, one 365.25-day year)
//! - Default parameters of the Kepler equation solver
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Days in the year used to normalize the mean motion.
///
/// A body with `a = 1 AU` completes one revolution in exactly this many days.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Full turn in degrees
pub const FULL_TURN_DEG: f64 = 360.0;

// -------------------------------------------------------------------------------------------------
// Kepler solver defaults
// -------------------------------------------------------------------------------------------------

/// Number of Newton-Raphson steps of the default fixed-iteration solver
pub const KEPLER_ITERATIONS: usize = 10;

/// Default `|ΔE|` stopping threshold of the convergence-based solver (radians)
pub const KEPLER_TOLERANCE: f64 = 1e-9;

/// Default iteration cap of the convergence-based solver
pub const KEPLER_MAX_ITERATIONS: usize = 50;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Modified Julian Date (days)
pub type MJD = f64;
