use core::fmt;

use grid_util::point::Point;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::f64::consts::SQRT_2;

use crate::error::PlanError;

/// A classification key as supplied by the raster collaborator.
pub type Rgb = [u8; 3];

/// Neighborhood used during search: orthogonal moves only, or orthogonal
/// plus diagonal moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    Four,
    Eight,
}

/// Neighbor offsets with their step lengths, orthogonal moves first. The
/// order is fixed so that FIFO tie-breaking in the search is reproducible.
const DELTAS: [(i32, i32, f64); 8] = [
    (-1, 0, 1.0),
    (1, 0, 1.0),
    (0, -1, 1.0),
    (0, 1, 1.0),
    (-1, -1, SQRT_2),
    (-1, 1, SQRT_2),
    (1, -1, SQRT_2),
    (1, 1, SQRT_2),
];

impl Connectivity {
    pub(crate) fn deltas(self) -> &'static [(i32, i32, f64)] {
        match self {
            Connectivity::Four => &DELTAS[..4],
            Connectivity::Eight => &DELTAS[..],
        }
    }
}

/// A fixed-size traversal-cost grid: a row-major `f64` arena indexed by
/// `y * width + x`, where [`f64::INFINITY`] marks an impassable cell and
/// every finite entry is non-negative. Built once per planning request and
/// read-only thereafter; diversity transforms operate on [`Clone`]d copies.
#[derive(Clone, Debug)]
pub struct CostGrid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl CostGrid {
    pub fn new(width: usize, height: usize, value: f64) -> CostGrid {
        CostGrid {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Builds a grid from nested rows, the shape an accelerated search
    /// backend exchanges at the boundary. Rows must all have equal length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<CostGrid, PlanError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let cells: Vec<f64> = rows.into_iter().flatten().collect();
        if cells.len() != width * height {
            return Err(PlanError::RasterSizeMismatch {
                width,
                height,
                actual: cells.len(),
            });
        }
        Ok(CostGrid {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[self.get_ix(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, cost: f64) {
        let ix = self.get_ix(x, y);
        self.cells[ix] = cost;
    }

    pub fn get_point(&self, p: Point) -> f64 {
        self.get(p.x as usize, p.y as usize)
    }

    pub fn get_ix(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn point_in_bounds(&self, p: Point) -> bool {
        self.in_bounds(p.x, p.y)
    }

    /// A cell is passable when its cost is finite.
    pub fn is_passable(&self, p: Point) -> bool {
        self.point_in_bounds(p) && self.get_point(p).is_finite()
    }

    /// In-bounds passable neighbors of `node` with their edge costs: the
    /// average of the two cell costs times the step length (1 orthogonal,
    /// sqrt(2) diagonal).
    pub(crate) fn successors(
        &self,
        node: &Point,
        connectivity: Connectivity,
    ) -> SmallVec<[(Point, f64); 8]> {
        let node_cost = self.get_point(*node);
        connectivity
            .deltas()
            .iter()
            .filter_map(|&(dx, dy, step)| {
                let n = Point::new(node.x + dx, node.y + dy);
                if !self.point_in_bounds(n) {
                    return None;
                }
                let neighbor_cost = self.get_point(n);
                if !neighbor_cost.is_finite() {
                    return None;
                }
                Some((n, (node_cost + neighbor_cost) / 2.0 * step))
            })
            .collect()
    }

    /// Generates a [`UnionFind`] structure linking passable grid neighbours
    /// into connected components under the given connectivity.
    pub fn components(&self, connectivity: Connectivity) -> UnionFind<usize> {
        let mut components = UnionFind::new(self.width * self.height);
        // Forward neighbours suffice; earlier cells already linked back.
        let forward: &[(i32, i32)] = match connectivity {
            Connectivity::Four => &[(1, 0), (0, 1)],
            Connectivity::Eight => &[(1, 0), (0, 1), (1, 1), (-1, 1)],
        };
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let p = Point::new(x, y);
                if !self.get_point(p).is_finite() {
                    continue;
                }
                let parent_ix = self.get_ix(x as usize, y as usize);
                for &(dx, dy) in forward {
                    let n = Point::new(x + dx, y + dy);
                    if self.is_passable(n) {
                        components.union(parent_ix, self.get_ix(n.x as usize, n.y as usize));
                    }
                }
            }
        }
        components
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point, connectivity: Connectivity) -> bool {
        if self.point_in_bounds(*start) && self.point_in_bounds(*goal) {
            let components = self.components(connectivity);
            let start_ix = self.get_ix(start.x as usize, start.y as usize);
            let goal_ix = self.get_ix(goal.x as usize, goal.y as usize);
            !components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }
}

impl fmt::Display for CostGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Grid:")?;
        for y in 0..self.height {
            let values = (0..self.width)
                .map(|x| self.get(x, y))
                .collect::<Vec<f64>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}

/// Classifies raster cells into traversal costs against an ordered palette.
///
/// Each cell's key is matched exactly against the palette first; otherwise
/// the nearest key by Euclidean distance over RGB components wins, with ties
/// resolving to the first key in palette order. When a match threshold is
/// set, a nearest distance above it marks the cell impassable.
#[derive(Clone, Debug)]
pub struct CostGridBuilder {
    palette: Vec<(Rgb, f64)>,
    match_threshold: Option<f64>,
}

fn rgb_distance(a: Rgb, b: Rgb) -> f64 {
    (0..3)
        .map(|i| {
            let d = a[i] as f64 - b[i] as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

impl CostGridBuilder {
    pub fn new(palette: Vec<(Rgb, f64)>) -> CostGridBuilder {
        CostGridBuilder {
            palette,
            match_threshold: None,
        }
    }

    pub fn with_match_threshold(mut self, threshold: f64) -> CostGridBuilder {
        self.match_threshold = Some(threshold);
        self
    }

    /// Builds a cost grid from a row-major raster of classification keys.
    /// Pure function of the builder and its inputs.
    pub fn build(
        &self,
        width: usize,
        height: usize,
        pixels: &[Rgb],
    ) -> Result<CostGrid, PlanError> {
        if pixels.len() != width * height {
            return Err(PlanError::RasterSizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        let mut grid = CostGrid::new(width, height, f64::INFINITY);
        for y in 0..height {
            for x in 0..width {
                grid.set(x, y, self.classify(pixels[y * width + x]));
            }
        }
        Ok(grid)
    }

    fn classify(&self, rgb: Rgb) -> f64 {
        // An exact palette hit bypasses the threshold.
        for &(key, cost) in &self.palette {
            if key == rgb {
                return cost;
            }
        }
        let mut best_distance = f64::INFINITY;
        let mut best_cost = f64::INFINITY;
        for &(key, cost) in &self.palette {
            let d = rgb_distance(key, rgb);
            if d < best_distance {
                best_distance = d;
                best_cost = cost;
            }
        }
        match self.match_threshold {
            Some(threshold) if best_distance > threshold => f64::INFINITY,
            _ => best_cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROAD: Rgb = [255, 255, 255];
    const FOREST: Rgb = [29, 106, 43];
    const WATER: Rgb = [0, 0, 255];

    fn palette() -> Vec<(Rgb, f64)> {
        vec![(ROAD, 1.0), (FOREST, 2.5), (WATER, f64::INFINITY)]
    }

    #[test]
    fn exact_match() {
        let builder = CostGridBuilder::new(palette());
        let grid = builder.build(2, 1, &[ROAD, WATER]).unwrap();
        assert_eq!(grid.get(0, 0), 1.0);
        assert!(!grid.get(1, 0).is_finite());
    }

    #[test]
    fn nearest_match_without_threshold() {
        let builder = CostGridBuilder::new(palette());
        // Slightly off-white maps to the road entry.
        let grid = builder.build(1, 1, &[[250, 250, 250]]).unwrap();
        assert_eq!(grid.get(0, 0), 1.0);
    }

    #[test]
    fn threshold_marks_far_colors_impassable() {
        let builder = CostGridBuilder::new(palette()).with_match_threshold(20.0);
        let grid = builder.build(2, 1, &[[250, 250, 250], [128, 0, 0]]).unwrap();
        assert_eq!(grid.get(0, 0), 1.0);
        assert!(!grid.get(1, 0).is_finite());
    }

    #[test]
    fn equidistant_keys_resolve_to_first_in_palette() {
        // Both keys are at distance 10 from the probe color.
        let builder = CostGridBuilder::new(vec![([10, 0, 0], 3.0), ([30, 0, 0], 7.0)]);
        let grid = builder.build(1, 1, &[[20, 0, 0]]).unwrap();
        assert_eq!(grid.get(0, 0), 3.0);
    }

    #[test]
    fn empty_palette_is_all_impassable() {
        let builder = CostGridBuilder::new(Vec::new());
        let grid = builder.build(2, 2, &[ROAD; 4]).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                assert!(!grid.get(x, y).is_finite());
            }
        }
    }

    #[test]
    fn raster_size_mismatch() {
        let builder = CostGridBuilder::new(palette());
        let err = builder.build(2, 2, &[ROAD; 3]).unwrap_err();
        assert!(matches!(err, PlanError::RasterSizeMismatch { actual: 3, .. }));
    }

    #[test]
    fn from_rows_round_trip() {
        let grid = CostGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0, f64::INFINITY]]).unwrap();
        assert_eq!(grid.width(), 2);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 1), f64::INFINITY);
        assert_eq!(grid.get(0, 1), 3.0);
    }

    #[test]
    fn from_rows_ragged() {
        let err = CostGrid::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, PlanError::RasterSizeMismatch { .. }));
    }

    #[test]
    fn component_generation() {
        // A full-height impassable wall at x = 1 splits the grid in two.
        let mut grid = CostGrid::new(3, 2, 1.0);
        grid.set(1, 0, f64::INFINITY);
        grid.set(1, 1, f64::INFINITY);
        let left = Point::new(0, 0);
        let right = Point::new(2, 0);
        let below = Point::new(0, 1);
        assert!(grid.unreachable(&left, &right, Connectivity::Eight));
        assert!(!grid.unreachable(&left, &below, Connectivity::Eight));
    }

    #[test]
    fn diagonal_gap_connectivity() {
        // Passable corners touch only diagonally.
        let mut grid = CostGrid::new(2, 2, f64::INFINITY);
        grid.set(0, 0, 1.0);
        grid.set(1, 1, 1.0);
        let a = Point::new(0, 0);
        let b = Point::new(1, 1);
        assert!(grid.unreachable(&a, &b, Connectivity::Four));
        assert!(!grid.unreachable(&a, &b, Connectivity::Eight));
    }

    #[test]
    fn out_of_bounds_is_unreachable() {
        let grid = CostGrid::new(2, 2, 1.0);
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(5, 0), Connectivity::Four));
    }
}
