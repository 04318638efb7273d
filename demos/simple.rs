use grid_routing::{AstarSearch, Connectivity, CostGrid, SearchBackend};
use grid_util::point::Point;

// In this example a route is found on a grid with shape
// .....
// .S...
// .###.
// ...E.
// .....
// S marks the start
// E marks the end
// The wall row is impassable, everything else costs 1.
fn main() {
    let mut grid = CostGrid::new(5, 5, 1.0);
    for x in 1..4 {
        grid.set(x, 2, f64::INFINITY);
    }
    let start = Point::new(1, 1);
    let end = Point::new(3, 3);
    match AstarSearch::new().find(&grid, start, end, Connectivity::Eight) {
        Ok(result) => {
            println!("A route has been found, cost {:.2}:", result.cost);
            for p in result.path {
                println!("{:?}", p);
            }
        }
        Err(e) => println!("No route: {e}"),
    }
}
