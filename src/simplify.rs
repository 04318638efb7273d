//! Reduces a cell-by-cell route to a minimal set of line-of-sight waypoints.

use grid_util::point::Point;

use crate::grid::CostGrid;

/// Checks that the straight segment between two cells crosses no impassable
/// cell. The segment is sampled at unit steps, each sample rounded to the
/// nearest grid cell; a sample out of bounds counts as blocked.
pub fn line_of_sight_clear(p1: Point, p2: Point, grid: &CostGrid) -> bool {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let steps = dx.abs().max(dy.abs());
    if steps == 0 {
        return true;
    }
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let xi = (p1.x as f64 + dx as f64 * t).round() as i32;
        let yi = (p1.y as f64 + dy as f64 * t).round() as i32;
        if !grid.in_bounds(xi, yi) {
            return false;
        }
        if !grid.get(xi as usize, yi as usize).is_finite() {
            return false;
        }
    }
    true
}

/// Greedy farthest-visible-point reduction: from each kept waypoint, jump to
/// the farthest path cell still in clear line of sight, falling back to the
/// immediate successor when nothing farther is visible.
///
/// The output starts and ends exactly where the input does, every
/// consecutive output pair is line-of-sight clear on `grid`, and the output
/// is never longer than the input.
pub fn simplify_path(path: &[Point], grid: &CostGrid) -> Vec<Point> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut simplified = vec![path[0]];
    let mut i = 0;
    while i < path.len() - 1 {
        let mut j = path.len() - 1;
        while j > i + 1 && !line_of_sight_clear(path[i], path[j], grid) {
            j -= 1;
        }
        simplified.push(path[j]);
        i = j;
    }
    simplified
}
