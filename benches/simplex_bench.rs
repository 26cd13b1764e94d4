//! Simplex solve throughput on a synthetic dense LP, in the style of
//! `examples/hadronomy-advent-of-code`'s per-puzzle `benches/benchmarks.rs`
//! (a `criterion`, `harness = false` bench next to the hot loop it measures).
//! `achronyme-core` declares `criterion` as a workspace dev-dependency but
//! never wires it up inside `achronyme-solver`; this is the first actual
//! consumer.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lp_solver::{solve, ConstraintBound, Direction, Keyed, Model, SolveOptions, VariableSet};

/// A dense knapsack-shaped LP: `n` variables each competing for the same
/// handful of shared resource constraints, sized to exercise a non-trivial
/// number of simplex pivots without integer branching.
fn synthetic_model(n: usize) -> Model {
    let resources = ["wood", "labor", "storage", "capital"];
    let constraints = Keyed::List(
        resources
            .iter()
            .map(|r| (r.to_string(), ConstraintBound::max(10_000.0)))
            .collect(),
    );
    let variables = Keyed::List(
        (0..n)
            .map(|i| {
                let mut coeffs: Vec<(String, f64)> = resources
                    .iter()
                    .enumerate()
                    .map(|(j, r)| (r.to_string(), 1.0 + ((i * 7 + j * 13) % 23) as f64))
                    .collect();
                coeffs.push(("profit".to_string(), 1.0 + ((i * 11) % 17) as f64));
                (format!("x{i}"), Keyed::List(coeffs))
            })
            .collect(),
    );
    Model {
        direction: Direction::Maximize,
        objective: Some("profit".to_string()),
        constraints,
        variables,
        integers: VariableSet::None,
        binaries: VariableSet::None,
    }
}

fn bench_simplex(c: &mut Criterion) {
    let small = synthetic_model(20);
    let medium = synthetic_model(200);
    let options = SolveOptions::default();

    let mut group = c.benchmark_group("simplex_solve");
    group.bench_function("20_variables", |b| {
        b.iter(|| black_box(solve(black_box(&small), Some(options))))
    });
    group.bench_function("200_variables", |b| {
        b.iter(|| black_box(solve(black_box(&medium), Some(options))))
    });
    group.finish();
}

criterion_group!(benches, bench_simplex);
criterion_main!(benches);
