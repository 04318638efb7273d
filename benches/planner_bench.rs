use criterion::{criterion_group, criterion_main, Criterion};
use grid_routing::{
    AstarSearch, Connectivity, CostGrid, DiversePathPlanner, DiversityConfig, DiversityMode,
    SearchBackend,
};
use grid_util::point::Point;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::hint::black_box;

/// A 64x64 grid with scattered impassable blocks and mixed terrain costs,
/// endpoints kept open.
fn obstacle_grid() -> CostGrid {
    let n = 64;
    let mut rng = StdRng::seed_from_u64(0);
    let mut grid = CostGrid::new(n, n, 1.0);
    for y in 0..n {
        for x in 0..n {
            if rng.gen_bool(0.2) {
                grid.set(x, y, f64::INFINITY);
            } else {
                grid.set(x, y, rng.gen_range(1.0..3.0));
            }
        }
    }
    grid.set(0, 0, 1.0);
    grid.set(n - 1, n - 1, 1.0);
    grid
}

fn search_bench(c: &mut Criterion) {
    let grid = obstacle_grid();
    let solver = AstarSearch::new();
    let start = Point::new(0, 0);
    let goal = Point::new(63, 63);
    c.bench_function("astar 64x64, 8-grid", |b| {
        b.iter(|| black_box(solver.find(&grid, start, goal, Connectivity::Eight)))
    });
}

fn planner_bench(c: &mut Criterion) {
    let grid = obstacle_grid();
    let planner = DiversePathPlanner::new();
    let start = Point::new(0, 0);
    let goal = Point::new(63, 63);
    let config = DiversityConfig {
        max_routes: 3,
        overlap_max: 0.5,
        mode: DiversityMode::Penalize,
        base_penalty: 6.0,
        radius: 4,
        decay: 0.6,
    };
    c.bench_function("diverse k=3 64x64, 8-grid", |b| {
        b.iter(|| black_box(planner.find_diverse(&grid, start, goal, Connectivity::Eight, &config)))
    });
}

criterion_group!(benches, search_bench, planner_bench);
criterion_main!(benches);
