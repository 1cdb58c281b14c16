use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use narwhal_projection::{CancelToken, Solver, SolverParameters};
use std::hint::black_box;

/// Rows of overlapping boxes that must be pushed apart, with a few long-range constraints mixed
/// in so blocks both merge and expand.
fn build(n: usize) -> Solver {
    let mut s = Solver::new();
    let ids: Vec<_> = (0..n)
        .map(|i| {
            let desired = ((i * 7919) % 97) as f64;
            let weight = 1.0 + (i % 3) as f64;
            s.add_variable(desired, weight, 1.0)
                .unwrap_or_else(|e| panic!("bench input: {e}"))
        })
        .collect();
    for w in ids.windows(2) {
        s.add_constraint(w[0], w[1], 5.0, false)
            .unwrap_or_else(|e| panic!("bench input: {e}"));
    }
    for i in (0..n.saturating_sub(10)).step_by(10) {
        s.add_constraint(ids[i], ids[i + 10], 60.0, false)
            .unwrap_or_else(|e| panic!("bench input: {e}"));
    }
    s
}

fn bench_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_solve");
    for n in [100usize, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_batched(
                || build(n),
                |mut s| {
                    let solution = s
                        .solve(&SolverParameters::default(), &CancelToken::new())
                        .unwrap_or_else(|e| panic!("solve failed: {e}"));
                    black_box(solution.goal_function_value)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_projection);
criterion_main!(benches);
