//! Orchestrates repeated searches, reshaping the cost landscape around
//! already-accepted routes so later routes are pushed elsewhere.

use core::fmt;
use std::str::FromStr;

use grid_util::point::Point;
use log::info;

use crate::diversity::{jaccard_overlap, mask_out_path, penalize_cost_grid};
use crate::error::PlanError;
use crate::grid::{Connectivity, CostGrid};
use crate::solver::{AstarSearch, SearchBackend, SearchResult};

/// How the cost landscape is reshaped around accepted routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiversityMode {
    /// Raise costs near prior routes without forbidding them.
    Penalize,
    /// Forbid cells near prior routes outright.
    Disjoint,
}

impl FromStr for DiversityMode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<DiversityMode, PlanError> {
        match s {
            "penalize" => Ok(DiversityMode::Penalize),
            "disjoint" => Ok(DiversityMode::Disjoint),
            other => Err(PlanError::InvalidMode(other.to_owned())),
        }
    }
}

impl fmt::Display for DiversityMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiversityMode::Penalize => write!(f, "penalize"),
            DiversityMode::Disjoint => write!(f, "disjoint"),
        }
    }
}

/// Parameters for diverse route planning. All fields are explicit; the core
/// carries no hidden defaults.
#[derive(Clone, Debug)]
pub struct DiversityConfig {
    /// Number of routes to try to find.
    pub max_routes: usize,
    /// Maximum allowed Jaccard overlap between any two accepted routes.
    pub overlap_max: f64,
    pub mode: DiversityMode,
    /// Base penalty added near accepted paths in penalize mode.
    pub base_penalty: f64,
    /// Neighborhood radius used by penalties and masking.
    pub radius: i32,
    /// Penalty decay factor per unit distance, in (0, 1].
    pub decay: f64,
}

impl DiversityConfig {
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.max_routes < 1 {
            return Err(PlanError::InvalidConfig(
                "max_routes must be at least 1".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.overlap_max) {
            return Err(PlanError::InvalidConfig(format!(
                "overlap_max must be within 0..=1, got {}",
                self.overlap_max
            )));
        }
        if !self.base_penalty.is_finite() || self.base_penalty < 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "base_penalty must be non-negative, got {}",
                self.base_penalty
            )));
        }
        if self.radius < 0 {
            return Err(PlanError::InvalidConfig(format!(
                "radius must be non-negative, got {}",
                self.radius
            )));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(PlanError::InvalidConfig(format!(
                "decay must be within (0, 1], got {}",
                self.decay
            )));
        }
        Ok(())
    }
}

/// An accepted route: its 1-based number, a human label, and the search
/// result it was accepted with.
#[derive(Clone, Debug)]
pub struct Route {
    pub number: usize,
    pub label: String,
    pub path: Vec<Point>,
    pub cost: f64,
}

impl Route {
    fn accepted(number: usize, result: SearchResult) -> Route {
        Route {
            number,
            label: format!("Route {} ({:.2})", number, result.cost),
            path: result.path,
            cost: result.cost,
        }
    }
}

/// Why planning stopped before (or at) the requested route count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// All requested routes were accepted.
    Complete,
    /// A candidate stayed too similar to the accepted routes even after
    /// escalation.
    OverlapExceeded,
    /// No further path exists on the reshaped grid (or none at all).
    Exhausted,
}

/// Routes in acceptance order. Route 1 is the unconstrained shortest path;
/// later routes are increasingly diversity-constrained. A set shorter than
/// requested is a documented outcome, not an error; [`RouteSet::stop_reason`]
/// tells the caller why.
#[derive(Clone, Debug)]
pub struct RouteSet {
    routes: Vec<Route>,
    stop_reason: StopReason,
}

impl RouteSet {
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }
}

/// Discovers up to k mutually diverse routes between the same endpoints.
#[derive(Clone, Debug)]
pub struct DiversePathPlanner<S = AstarSearch> {
    backend: S,
}

impl DiversePathPlanner<AstarSearch> {
    pub fn new() -> DiversePathPlanner<AstarSearch> {
        DiversePathPlanner {
            backend: AstarSearch::new(),
        }
    }
}

impl Default for DiversePathPlanner<AstarSearch> {
    fn default() -> Self {
        DiversePathPlanner::new()
    }
}

impl<S: SearchBackend> DiversePathPlanner<S> {
    pub fn with_backend(backend: S) -> DiversePathPlanner<S> {
        DiversePathPlanner { backend }
    }

    /// Finds up to `config.max_routes` routes from `start` to `goal`.
    ///
    /// Route 1 is a plain search on the unmodified grid, and its endpoint
    /// errors propagate. From route 2 on, each candidate is searched on a
    /// working grid derived fresh from the base grid with every accepted
    /// route's diversity transform applied, and must stay within
    /// `config.overlap_max` Jaccard overlap of all accepted routes.
    pub fn find_diverse(
        &self,
        grid: &CostGrid,
        start: Point,
        goal: Point,
        connectivity: Connectivity,
        config: &DiversityConfig,
    ) -> Result<RouteSet, PlanError> {
        config.validate()?;

        let first = match self.backend.find(grid, start, goal, connectivity) {
            Ok(result) => result,
            Err(PlanError::NoPathFound { .. }) => {
                info!("no route at all from {} to {}", start, goal);
                return Ok(RouteSet {
                    routes: Vec::new(),
                    stop_reason: StopReason::Exhausted,
                });
            }
            Err(e) => return Err(e),
        };
        info!("route 1: nodes={}, cost={:.2}", first.path.len(), first.cost);
        let mut routes = vec![Route::accepted(1, first)];
        let mut stop_reason = StopReason::Complete;

        for number in 2..=config.max_routes {
            let work = self.reshaped_grid(grid, &routes, config, config.base_penalty, config.radius);
            let mut candidate = match self.backend.find(&work, start, goal, connectivity) {
                Ok(result) => result,
                Err(PlanError::NoPathFound { .. }) => {
                    info!("route {}: no path on reshaped grid, stopping", number);
                    stop_reason = StopReason::Exhausted;
                    break;
                }
                Err(e) => return Err(e),
            };
            let mut ok = self.within_overlap(&routes, &candidate.path, config.overlap_max);

            // One escalation with stronger reshaping before giving up on
            // similarity, penalize mode only.
            if !ok && config.mode == DiversityMode::Penalize {
                let work = self.reshaped_grid(
                    grid,
                    &routes,
                    config,
                    config.base_penalty * 1.5,
                    config.radius + 1,
                );
                match self.backend.find(&work, start, goal, connectivity) {
                    Ok(result) => {
                        ok = self.within_overlap(&routes, &result.path, config.overlap_max);
                        candidate = result;
                    }
                    Err(PlanError::NoPathFound { .. }) => {}
                    Err(e) => return Err(e),
                }
            }

            if !ok {
                info!(
                    "route {}: too similar (overlap > {:.2}), stopping",
                    number, config.overlap_max
                );
                stop_reason = StopReason::OverlapExceeded;
                break;
            }
            info!(
                "route {}: nodes={}, cost={:.2}",
                number,
                candidate.path.len(),
                candidate.cost
            );
            routes.push(Route::accepted(number, candidate));
        }

        Ok(RouteSet {
            routes,
            stop_reason,
        })
    }

    /// Derives a working grid from the base grid, applying the diversity
    /// transform of every accepted route. Penalties never compound across
    /// iterations because derivation always restarts from the base grid.
    fn reshaped_grid(
        &self,
        base: &CostGrid,
        routes: &[Route],
        config: &DiversityConfig,
        base_penalty: f64,
        radius: i32,
    ) -> CostGrid {
        let mut work = base.clone();
        for route in routes {
            match config.mode {
                DiversityMode::Penalize => {
                    penalize_cost_grid(&mut work, &route.path, base_penalty, radius, config.decay)
                }
                DiversityMode::Disjoint => mask_out_path(&mut work, &route.path, radius),
            }
        }
        work
    }

    fn within_overlap(&self, routes: &[Route], candidate: &[Point], overlap_max: f64) -> bool {
        routes
            .iter()
            .all(|r| jaccard_overlap(&r.path, candidate) <= overlap_max)
    }
}
