//! Diversity helpers: route similarity and the cost-landscape transforms the
//! planner applies around accepted routes.

use fxhash::FxHashSet;
use grid_util::point::Point;
use itertools::Itertools;

use crate::grid::CostGrid;

/// Jaccard overlap between two paths viewed as cell sets: shared cells over
/// total distinct cells. Two empty paths overlap 0.
pub fn jaccard_overlap(a: &[Point], b: &[Point]) -> f64 {
    let sa: FxHashSet<Point> = a.iter().copied().collect();
    let sb: FxHashSet<Point> = b.iter().copied().collect();
    if sa.is_empty() && sb.is_empty() {
        return 0.0;
    }
    let shared = sa.intersection(&sb).count();
    let total = sa.union(&sb).count();
    shared as f64 / total as f64
}

/// Raises costs around `path`: every finite cell at Euclidean distance
/// `d <= radius` of a path cell gains `base_penalty * decay^d`. A cell near
/// several path cells is penalized once per nearby path cell, so penalties
/// accumulate additively, as they do across multiple accepted paths.
pub fn penalize_cost_grid(
    grid: &mut CostGrid,
    path: &[Point],
    base_penalty: f64,
    radius: i32,
    decay: f64,
) {
    for cell in path {
        for (dx, dy) in (-radius..=radius).cartesian_product(-radius..=radius) {
            let n = Point::new(cell.x + dx, cell.y + dy);
            if !grid.point_in_bounds(n) {
                continue;
            }
            let d = ((dx * dx + dy * dy) as f64).sqrt();
            if d > radius as f64 {
                continue;
            }
            let current = grid.get_point(n);
            if current.is_finite() {
                grid.set(
                    n.x as usize,
                    n.y as usize,
                    current + base_penalty * decay.powf(d),
                );
            }
        }
    }
}

/// Masks out `path`: every cell at Euclidean distance `d <= radius` of a
/// path cell becomes impassable, except the path's endpoints, which stay
/// passable however many paths share them.
pub fn mask_out_path(grid: &mut CostGrid, path: &[Point], radius: i32) {
    let (Some(&start), Some(&goal)) = (path.first(), path.last()) else {
        return;
    };
    for cell in path {
        for (dx, dy) in (-radius..=radius).cartesian_product(-radius..=radius) {
            let n = Point::new(cell.x + dx, cell.y + dy);
            if !grid.point_in_bounds(n) || n == start || n == goal {
                continue;
            }
            let d = ((dx * dx + dy * dy) as f64).sqrt();
            if d <= radius as f64 {
                grid.set(n.x as usize, n.y as usize, f64::INFINITY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn points(coords: &[(i32, i32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn jaccard_identity() {
        let a = points(&[(0, 0), (1, 0), (2, 0)]);
        assert_relative_eq!(jaccard_overlap(&a, &a), 1.0);
    }

    #[test]
    fn jaccard_disjoint() {
        let a = points(&[(0, 0), (1, 0)]);
        let b = points(&[(5, 5), (6, 5)]);
        assert_relative_eq!(jaccard_overlap(&a, &b), 0.0);
    }

    #[test]
    fn jaccard_partial() {
        // 2 shared cells out of 4 distinct.
        let a = points(&[(0, 0), (1, 0), (2, 0)]);
        let b = points(&[(1, 0), (2, 0), (3, 0)]);
        assert_relative_eq!(jaccard_overlap(&a, &b), 0.5);
    }

    #[test]
    fn jaccard_empty() {
        assert_relative_eq!(jaccard_overlap(&[], &[]), 0.0);
    }

    #[test]
    fn penalize_decays_with_distance() {
        let mut grid = CostGrid::new(7, 7, 1.0);
        penalize_cost_grid(&mut grid, &points(&[(3, 3)]), 4.0, 2, 0.5);
        assert_relative_eq!(grid.get(3, 3), 1.0 + 4.0);
        assert_relative_eq!(grid.get(4, 3), 1.0 + 4.0 * 0.5);
        assert_relative_eq!(grid.get(5, 3), 1.0 + 4.0 * 0.25);
        // Distance sqrt(2) sits between the two rings.
        assert_relative_eq!(grid.get(4, 4), 1.0 + 4.0 * 0.5f64.powf(std::f64::consts::SQRT_2));
        // Outside the radius, and outside the circle at the square's corner.
        assert_relative_eq!(grid.get(6, 3), 1.0);
        assert_relative_eq!(grid.get(5, 5), 1.0);
    }

    #[test]
    fn penalize_accumulates_per_path_cell() {
        let mut grid = CostGrid::new(5, 1, 1.0);
        penalize_cost_grid(&mut grid, &points(&[(1, 0), (2, 0)]), 2.0, 1, 0.5);
        // (1,0) is hit at distance 0 by itself and distance 1 by (2,0).
        assert_relative_eq!(grid.get(1, 0), 1.0 + 2.0 + 2.0 * 0.5);
    }

    #[test]
    fn penalize_skips_impassable_cells() {
        let mut grid = CostGrid::new(3, 1, 1.0);
        grid.set(1, 0, f64::INFINITY);
        penalize_cost_grid(&mut grid, &points(&[(0, 0)]), 5.0, 2, 0.6);
        assert!(!grid.get(1, 0).is_finite());
    }

    #[test]
    fn mask_keeps_endpoints_passable() {
        let mut grid = CostGrid::new(5, 3, 1.0);
        let path = points(&[(0, 1), (1, 1), (2, 1), (3, 1), (4, 1)]);
        mask_out_path(&mut grid, &path, 1);
        assert!(grid.get(0, 1).is_finite());
        assert!(grid.get(4, 1).is_finite());
        assert!(!grid.get(2, 1).is_finite());
        assert!(!grid.get(2, 0).is_finite());
        assert!(!grid.get(2, 2).is_finite());
    }

    #[test]
    fn mask_radius_is_euclidean() {
        let mut grid = CostGrid::new(9, 9, 1.0);
        mask_out_path(&mut grid, &points(&[(4, 4)]), 2);
        // A lone cell is both endpoints, so it stays passable itself.
        assert!(grid.get(4, 4).is_finite());
        assert!(!grid.get(6, 4).is_finite());
        assert!(!grid.get(5, 5).is_finite());
        // The square's corner is at distance 2*sqrt(2) > 2.
        assert!(grid.get(6, 6).is_finite());
    }

    #[test]
    fn mask_empty_path_is_a_no_op() {
        let mut grid = CostGrid::new(2, 2, 1.0);
        mask_out_path(&mut grid, &[], 3);
        assert!(grid.get(0, 0).is_finite());
    }
}
