pub mod bodies;
pub mod constants;
pub mod horizons;
pub mod kepler;
pub mod kepsim_errors;
pub mod orbital_elements;
pub mod output;
pub mod propagator;
pub mod simulation;
pub mod time;
