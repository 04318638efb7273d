use grid_util::point::Point;
use log::info;

use crate::astar::weighted_astar;
use crate::error::PlanError;
use crate::grid::{Connectivity, CostGrid};

/// A path with its total traversal cost, the sum of edge costs along it.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub path: Vec<Point>,
    pub cost: f64,
}

/// Single-pair shortest-cost search on a cost grid.
///
/// The planner selects an implementation through this trait, so an
/// accelerated backend honoring the same contract can be swapped in without
/// the planner branching on its internals.
pub trait SearchBackend {
    fn find(
        &self,
        grid: &CostGrid,
        start: Point,
        goal: Point,
        connectivity: Connectivity,
    ) -> Result<SearchResult, PlanError>;
}

/// Reference search backend: weighted A* with a Euclidean heuristic.
///
/// An optional expansion cap bounds runtime on pathological inputs; hitting
/// it is reported the same as exhausting the frontier.
#[derive(Clone, Debug, Default)]
pub struct AstarSearch {
    pub expansion_limit: Option<usize>,
}

impl AstarSearch {
    pub fn new() -> AstarSearch {
        AstarSearch {
            expansion_limit: None,
        }
    }

    pub fn with_expansion_limit(limit: usize) -> AstarSearch {
        AstarSearch {
            expansion_limit: Some(limit),
        }
    }
}

impl SearchBackend for AstarSearch {
    fn find(
        &self,
        grid: &CostGrid,
        start: Point,
        goal: Point,
        connectivity: Connectivity,
    ) -> Result<SearchResult, PlanError> {
        for endpoint in [start, goal] {
            if !grid.point_in_bounds(endpoint) {
                return Err(PlanError::OutOfBounds {
                    point: endpoint,
                    width: grid.width(),
                    height: grid.height(),
                });
            }
            if !grid.get_point(endpoint).is_finite() {
                return Err(PlanError::ImpassableEndpoint(endpoint));
            }
        }
        // Quick-reject on connected components before flooding the frontier.
        if grid.unreachable(&start, &goal, connectivity) {
            info!("{} is not reachable from {}", goal, start);
            return Err(PlanError::NoPathFound { start, goal });
        }
        weighted_astar(grid, start, goal, connectivity, self.expansion_limit)
            .map(|(path, cost)| SearchResult { path, cost })
            .ok_or(PlanError::NoPathFound { start, goal })
    }
}
