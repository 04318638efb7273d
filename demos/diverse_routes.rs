use grid_routing::{
    simplify_path, Connectivity, CostGridBuilder, DiversePathPlanner, DiversityConfig,
    DiversityMode, Rgb,
};
use grid_util::point::Point;

const ROAD: Rgb = [255, 255, 255];
const GRASS: Rgb = [217, 217, 217];
const WATER: Rgb = [29, 106, 43];

// Classifies a small synthetic raster into a cost grid, then asks for up to
// three diverse routes across it and simplifies each one for rendering.
fn main() {
    let (w, h) = (20, 14);
    let mut pixels = vec![GRASS; w * h];
    for x in 0..w {
        pixels[7 * w + x] = ROAD;
    }
    for y in 5..10 {
        for x in 8..13 {
            pixels[y * w + x] = WATER;
        }
    }

    let grid = CostGridBuilder::new(vec![(ROAD, 1.0), (GRASS, 1.5), (WATER, f64::INFINITY)])
        .build(w, h, &pixels)
        .expect("raster matches dimensions");

    let config = DiversityConfig {
        max_routes: 3,
        overlap_max: 0.5,
        mode: DiversityMode::Penalize,
        base_penalty: 6.0,
        radius: 2,
        decay: 0.6,
    };
    let set = DiversePathPlanner::new()
        .find_diverse(
            &grid,
            Point::new(0, 7),
            Point::new(19, 7),
            Connectivity::Eight,
            &config,
        )
        .expect("endpoints are valid");

    println!("{} route(s), stopped: {:?}", set.len(), set.stop_reason());
    for route in set.iter() {
        let waypoints = simplify_path(&route.path, &grid);
        println!(
            "{}: {} cells, {} waypoints",
            route.label,
            route.path.len(),
            waypoints.len()
        );
    }
}
