//! Benchmarks for LSQ gradient reconstruction.
//!
//! Run with: `cargo bench --bench lsq_bench`
//!
//! Benchmarks coefficient construction and gradient evaluation for the
//! linear and two-step quadratic schemes on perturbed triangular grids.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ncfv_rs::gradient::StencilSet;
use ncfv_rs::mesh::structured;
use ncfv_rs::{
    DiagnosticLog, Euler2D, EulerSolution, FieldKind, GradientType, GradientWeight, Grid2D,
    LsqCoefficients, LsqConfig, LsqGradient, NodalField,
};

const SIZES: [usize; 3] = [16, 32, 64];

fn setup_grid(n: usize) -> Grid2D {
    let mut grid = structured::uniform_trias(0.0, 1.0, 0.0, 1.0, n, n).unwrap();
    structured::perturb_interior(&mut grid, 0.3);
    grid
}

fn setup_solution(grid: &Grid2D) -> EulerSolution {
    let w = NodalField::from_fn(grid.n_nodes(), |i| {
        let (x, y) = grid.coords(i);
        [1.0 + 0.1 * x * y, 0.5 + x, 0.2 - y, 1.0 + 0.05 * x * x]
    });
    EulerSolution::from_primitives(&Euler2D::default(), w)
}

fn config(gradient_type: GradientType) -> LsqConfig {
    LsqConfig::new()
        .with_gradient_type(gradient_type)
        .with_weight(GradientWeight::InverseDistance { p: 1.0 })
}

/// Benchmark coefficient construction.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("lsq_build");
    let log = DiagnosticLog::disabled();

    for n in SIZES {
        let grid = setup_grid(n);
        let n_nodes = grid.n_nodes();

        for gradient_type in [GradientType::Linear, GradientType::Quadratic2] {
            let config = config(gradient_type);
            let set = StencilSet::for_type(gradient_type);
            group.bench_with_input(
                BenchmarkId::new(gradient_type.as_str(), format!("{}_nodes", n_nodes)),
                &n_nodes,
                |b, _| {
                    b.iter(|| {
                        LsqCoefficients::build_with(black_box(&grid), &config, set, &log).unwrap()
                    });
                },
            );

            #[cfg(feature = "parallel")]
            group.bench_with_input(
                BenchmarkId::new(
                    format!("{}_parallel", gradient_type.as_str()),
                    format!("{}_nodes", n_nodes),
                ),
                &n_nodes,
                |b, _| {
                    b.iter(|| {
                        LsqCoefficients::build_parallel(black_box(&grid), &config, set, &log)
                            .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

/// Benchmark gradient evaluation of all primitive variables.
fn bench_gradients(c: &mut Criterion) {
    let mut group = c.benchmark_group("lsq_gradients");

    for n in SIZES {
        let grid = setup_grid(n);
        let n_nodes = grid.n_nodes();

        for gradient_type in [GradientType::Linear, GradientType::Quadratic2] {
            let mut lsq = LsqGradient::build(&grid, &config(gradient_type)).unwrap();
            let mut solution = setup_solution(&grid);

            group.bench_with_input(
                BenchmarkId::new(gradient_type.as_str(), format!("{}_nodes", n_nodes)),
                &n_nodes,
                |b, _| {
                    b.iter(|| {
                        lsq.compute_gradients(&grid, black_box(&mut solution), FieldKind::Primitive)
                            .unwrap()
                    });
                },
            );

            #[cfg(feature = "parallel")]
            group.bench_with_input(
                BenchmarkId::new(
                    format!("{}_parallel", gradient_type.as_str()),
                    format!("{}_nodes", n_nodes),
                ),
                &n_nodes,
                |b, _| {
                    b.iter(|| {
                        for ivar in 0..ncfv_rs::NQ {
                            lsq.compute_gradient_parallel(
                                &grid,
                                black_box(&mut solution),
                                FieldKind::Primitive,
                                ivar,
                                gradient_type,
                            )
                            .unwrap();
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_gradients);
criterion_main!(benches);
