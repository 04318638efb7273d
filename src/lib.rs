//! # grid_routing
//!
//! Grid-based route planning. Converts a classified raster surface into a
//! traversal-cost grid, computes shortest-cost routes with weighted
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm), and discovers up
//! to k mutually diverse routes between the same endpoints by iteratively
//! reshaping the cost landscape around previously accepted routes.
//! Pre-computes [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory))
//! before each search to avoid flood-filling behaviour if no path exists.
//!
//! The building blocks, leaves first:
//!
//! - [`CostGridBuilder`] classifies raster cells into traversal costs
//!   against an ordered palette.
//! - [`AstarSearch`] finds a single shortest-cost route on a [`CostGrid`];
//!   any [`SearchBackend`] honoring the same contract can stand in for it.
//! - [`DiversePathPlanner`] drives repeated searches, penalizing or masking
//!   the neighborhood of accepted routes until the requested number of
//!   sufficiently different routes is found or diversity runs out.
//! - [`simplify_path`] reduces a cell-by-cell route to its line-of-sight
//!   waypoints for rendering.
//!
//! All operations are synchronous, CPU-bound pure computations over
//! immutable inputs; separate planning requests share no state.

mod astar;
mod error;

pub mod diversity;
pub mod grid;
pub mod planner;
pub mod simplify;
pub mod solver;

pub use diversity::jaccard_overlap;
pub use error::PlanError;
pub use grid::{Connectivity, CostGrid, CostGridBuilder, Rgb};
pub use planner::{
    DiversePathPlanner, DiversityConfig, DiversityMode, Route, RouteSet, StopReason,
};
pub use simplify::{line_of_sight_clear, simplify_path};
pub use solver::{AstarSearch, SearchBackend, SearchResult};
