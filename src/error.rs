use grid_util::point::Point;

/// Errors surfaced by grid construction, search and planning.
///
/// A diversity shortfall (fewer than the requested number of routes) is not
/// an error; see [`RouteSet::stop_reason`](crate::planner::RouteSet::stop_reason).
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A supplied coordinate lies outside the grid. Usage error, not retried.
    #[error("coordinate {point} is outside the {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },

    /// Start or goal cell has infinite cost.
    #[error("endpoint {0} is impassable")]
    ImpassableEndpoint(Point),

    /// The frontier emptied (or the expansion cap was hit) before the goal
    /// was settled.
    #[error("no path found from {start} to {goal}")]
    NoPathFound { start: Point, goal: Point },

    /// A diversity mode string outside the known set.
    #[error("diversity mode must be 'penalize' or 'disjoint', got '{0}'")]
    InvalidMode(String),

    /// A numeric planner parameter is out of range. Rejected before any
    /// search runs.
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),

    /// The raster buffer does not match the declared grid dimensions.
    #[error("raster has {actual} pixels but grid is {width}x{height}")]
    RasterSizeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },
}
