use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hifitime::Epoch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kepsim::constants::DPI;
use kepsim::kepler::KeplerSolver;
use kepsim::orbital_elements::OrbitalElementSet;
use kepsim::propagator::{KeplerPropagator, OutputMode, PropagatorParams};
use kepsim::time::DateRange;

fn epoch() -> Epoch {
    Epoch::from_mjd_utc(51544.0)
}

/// Random planet-like element set: a ∈ [0.3, 40] AU, e ∈ [0, 0.3], i ∈ [0, 20]°.
fn random_elements(rng: &mut StdRng) -> OrbitalElementSet {
    OrbitalElementSet::new(
        rng.random_range(0.0..0.3),
        rng.random_range(0.3..40.0),
        rng.random_range(0.0..20.0),
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..360.0),
        rng.random_range(0.0..360.0),
        epoch(),
    )
}

fn bench_solvers(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let samples = 10_000usize;

    for (name, solver) in [
        ("fixed_10", KeplerSolver::default()),
        ("converged", KeplerSolver::converged()),
    ] {
        c.bench_function(&format!("kepler_solver/{name}"), |b| {
            b.iter_batched(
                || {
                    (0..samples)
                        .map(|_| (rng.random::<f64>() * DPI, rng.random_range(0.0..0.9)))
                        .collect::<Vec<_>>()
                },
                |cases| {
                    for (mean_anomaly, e) in cases {
                        black_box(solver.solve(black_box(mean_anomaly), black_box(e)));
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
}

fn bench_propagate(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);
    let propagator = KeplerPropagator::new(PropagatorParams::default());

    for mode in [OutputMode::Longitude, OutputMode::Position] {
        c.bench_function(&format!("propagate/{mode:?}"), |b| {
            b.iter_batched(
                || {
                    (0..1_000)
                        .map(|_| (random_elements(&mut rng), rng.random_range(-20_000.0..20_000.0)))
                        .collect::<Vec<_>>()
                },
                |cases| {
                    for (elements, days) in cases {
                        black_box(propagator.propagate_days(&elements, black_box(days), mode));
                    }
                },
                BatchSize::LargeInput,
            )
        });
    }
}

/// One body over a century of daily dates, as the CLI does.
fn bench_century_range(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xFEEDFACE);
    let elements = random_elements(&mut rng);
    let propagator = KeplerPropagator::default();
    let dates = DateRange::from_count(epoch(), 36_525, 1.0).unwrap();

    c.bench_function("propagate_range/century_daily", |b| {
        b.iter(|| {
            let sum: f64 = propagator
                .propagate_range(&elements, &dates, OutputMode::Longitude)
                .filter_map(|(_, r)| r.longitude())
                .sum();
            black_box(sum)
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_solvers, bench_propagate, bench_century_range
);
criterion_main!(benches);
