//! Benchmarks for the laser puzzle solver.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lazor::enumerate::placements;
use lazor::tracer::Tracer;
use lazor::{bff, solve, Board, SolverConfig};

fn fork_board() -> Board {
    bff::parse(include_str!("../boards/fork.bff")).expect("bundled board parses")
}

/// Benchmark the complete search, sequential and parallel.
fn bench_solve(c: &mut Criterion) {
    let board = fork_board();
    let mut group = c.benchmark_group("solve_fork");
    for parallel in [false, true] {
        let config = SolverConfig {
            parallel,
            step_cap: None,
        };
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| b.iter(|| solve(black_box(&board), &config)));
    }
    group.finish();
}

/// Benchmark tracing the lasers over the solved grid.
fn bench_trace(c: &mut Criterion) {
    let board = fork_board();
    let solution = solve(&board, &SolverConfig::default())
        .into_solution()
        .expect("bundled board is solvable");
    let tracer = Tracer::for_board(&board, None);

    c.bench_function("trace_solved_grid", |b| {
        b.iter(|| tracer.run(black_box(&solution.grid)))
    });
}

/// Benchmark walking every candidate placement without tracing.
fn bench_enumerate(c: &mut Criterion) {
    let board = fork_board();

    c.bench_function("enumerate_placements", |b| {
        b.iter(|| placements(black_box(board.open_cells()), &board.inventory()).count())
    });
}

criterion_group!(benches, bench_solve, bench_trace, bench_enumerate);
criterion_main!(benches);
