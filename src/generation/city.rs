//! # City Generation
//!
//! Builds a complete [`VoxelGrid`] from a [`GenerationConfig`]: ground costs,
//! elevation, endpoints, buildings, loose obstacles and parked cars.
//!
//! Layers are applied in a fixed order. Endpoints go down before anything that
//! blocks, so buildings and cars simply skip those cells.

use super::{BuildingStrategy, GenerationConfig, Generator};
use crate::grid::{CellKind, Coordinate, GridDimensions, VoxelGrid};
use crate::{VoxError, VoxResult};
use log::{debug, info};
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::Rng;

/// Smallest rows/cols value that leaves room for both endpoints.
const MIN_PLAN_SIZE: u32 = 6;

/// Inclusive rectangle of (row, col) cells used by the recursive layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Plot {
    min_row: i32,
    max_row: i32,
    min_col: i32,
    max_col: i32,
}

impl Plot {
    fn is_too_small(&self) -> bool {
        self.max_row - self.min_row < 3 || self.max_col - self.min_col < 3
    }

    fn quadrants(&self) -> [Plot; 4] {
        let mid_row = (self.min_row + self.max_row) / 2;
        let mid_col = (self.min_col + self.max_col) / 2;
        [
            Plot { max_row: mid_row, max_col: mid_col, ..*self },
            Plot { max_row: mid_row, min_col: mid_col, ..*self },
            Plot { min_row: mid_row, max_col: mid_col, ..*self },
            Plot { min_row: mid_row, min_col: mid_col, ..*self },
        ]
    }
}

/// Procedural city generator.
///
/// # Examples
///
/// ```
/// use voxroute::{generation::utils, CityGenerator, GenerationConfig, Generator};
///
/// let config = GenerationConfig::for_testing(3);
/// let mut rng = utils::create_rng(&config);
/// let grid = CityGenerator::new().generate(&config, &mut rng).unwrap();
/// assert!(grid.start().is_some() && grid.goal().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct CityGenerator {
    /// Layouts to try before giving up when a route is required
    pub max_attempts: u32,
}

impl CityGenerator {
    /// Creates a generator with default settings.
    pub fn new() -> Self {
        Self { max_attempts: 20 }
    }

    /// Start and goal cells of a city plan with the given extent.
    ///
    /// The start sits two cells in from the top-left corner and the goal two
    /// cells in from the bottom-right, both on the ground.
    pub fn endpoints_for(rows: u32, cols: u32) -> (Coordinate, Coordinate) {
        (
            Coordinate::new(0, 2, 2),
            Coordinate::new(0, rows as i32 - 3, cols as i32 - 3),
        )
    }

    /// Produces one layout without checking reachability.
    pub fn build(&self, config: &GenerationConfig, rng: &mut StdRng) -> VoxResult<VoxelGrid> {
        if config.rows < MIN_PLAN_SIZE || config.cols < MIN_PLAN_SIZE {
            return Err(VoxError::InvalidDimensions(format!(
                "city plan needs at least {}x{} cells per level, got {}x{}",
                MIN_PLAN_SIZE, MIN_PLAN_SIZE, config.rows, config.cols
            )));
        }
        if !(0.0..=1.0).contains(&config.obstacle_density) {
            return Err(VoxError::InvalidArgument(format!(
                "obstacle density must be within [0, 1], got {}",
                config.obstacle_density
            )));
        }

        let dims = GridDimensions::new(config.levels, config.rows, config.cols);
        let mut grid = VoxelGrid::with_config(dims, config.grid.clone())?;

        if config.street_grid {
            self.lay_streets(&mut grid, config)?;
        }
        if config.elevation_amplitude > 0.0 {
            self.raise_terrain(&mut grid, config, rng)?;
        }

        let (start, goal) = Self::endpoints_for(config.rows, config.cols);
        grid.set_start(start)?;
        grid.set_goal(goal)?;

        match config.buildings {
            BuildingStrategy::None => {}
            BuildingStrategy::Scattered => self.place_scattered(&mut grid, rng),
            BuildingStrategy::Recursive => self.place_recursive(&mut grid, rng),
        }
        if config.obstacle_density > 0.0 {
            self.scatter_obstacles(&mut grid, config.obstacle_density, rng);
        }
        if config.car_count > 0 {
            self.park_cars(&mut grid, config.car_count, rng);
        }

        Ok(grid)
    }

    /// Street cells cost the terrain floor; everything else on the ground is
    /// raised to the off-road cost.
    fn lay_streets(&self, grid: &mut VoxelGrid, config: &GenerationConfig) -> VoxResult<()> {
        let spacing = config.street_spacing.max(1) as i32;
        let width = config.street_width as i32;
        let road_cost = grid.config().min_terrain_cost;

        for row in 0..config.rows as i32 {
            for col in 0..config.cols as i32 {
                let on_street = row % spacing < width || col % spacing < width;
                let cost = if on_street { road_cost } else { config.off_road_cost };
                grid.set_terrain_cost(Coordinate::new(0, row, col), cost)?;
            }
        }
        Ok(())
    }

    fn raise_terrain(
        &self,
        grid: &mut VoxelGrid,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> VoxResult<()> {
        let perlin = Perlin::new(rng.gen());
        let scale = config.elevation_scale;

        for row in 0..config.rows as i32 {
            for col in 0..config.cols as i32 {
                let sample = perlin.get([row as f64 * scale, col as f64 * scale]);
                let normalized = ((sample + 1.0) / 2.0).clamp(0.0, 1.0);
                grid.set_elevation(row, col, normalized * config.elevation_amplitude)?;
            }
        }
        Ok(())
    }

    fn place_scattered(&self, grid: &mut VoxelGrid, rng: &mut StdRng) {
        let (levels, rows, cols) = plan_extent(grid);
        let count = rng.gen_range(8..=15);

        for _ in 0..count {
            let row = rng.gen_range(2..=rows - 3);
            let col = rng.gen_range(2..=cols - 3);
            let height = rng.gen_range(1..=levels);
            build_column(grid, row, col, height);
        }
        debug!("Placed {} scattered buildings", count);
    }

    fn place_recursive(&self, grid: &mut VoxelGrid, rng: &mut StdRng) {
        let (levels, rows, cols) = plan_extent(grid);
        let per_edge = rng.gen_range(10..=12);
        let center_target = rng.gen_range(160..=170) - per_edge * 4;

        self.place_perimeter(grid, per_edge, rng);
        let center = Plot {
            min_row: 5,
            max_row: rows - 6,
            min_col: 5,
            max_col: cols - 6,
        };
        let placed = self.fill_center(grid, center, center_target, 0, rng);
        debug!(
            "Placed {} perimeter and {} center buildings on {} levels",
            per_edge * 4,
            placed,
            levels
        );
    }

    /// Evenly spaced towers along the four edges of the inner border.
    fn place_perimeter(&self, grid: &mut VoxelGrid, per_edge: i32, rng: &mut StdRng) {
        let (levels, rows, cols) = plan_extent(grid);
        let (min_r, max_r) = (2, rows - 3);
        let (min_c, max_c) = (2, cols - 3);
        let min_height = 2.min(levels);

        for edge in 0..4 {
            for i in 0..per_edge {
                let height = rng.gen_range(min_height..=levels);
                let jitter = rng.gen_range(0..=2);
                let (row, col) = match edge {
                    0 => (min_r, (min_c + (max_c - min_c) * i / per_edge + jitter).min(max_c)),
                    1 => (max_r, (min_c + (max_c - min_c) * i / per_edge + jitter).min(max_c)),
                    2 => ((min_r + (max_r - min_r) * i / per_edge + jitter).min(max_r), min_c),
                    _ => ((min_r + (max_r - min_r) * i / per_edge + jitter).min(max_r), max_c),
                };
                build_column(grid, row, col, height);
            }
        }
    }

    /// Drops one building in `plot`, then recurses into its quadrants until
    /// `target` buildings exist or the plots get too small.
    fn fill_center(
        &self,
        grid: &mut VoxelGrid,
        plot: Plot,
        target: i32,
        mut count: i32,
        rng: &mut StdRng,
    ) -> i32 {
        if count >= target || plot.is_too_small() {
            return count;
        }

        let (levels, _, _) = plan_extent(grid);
        let row = rng.gen_range(plot.min_row..=plot.max_row);
        let col = rng.gen_range(plot.min_col..=plot.max_col);
        let height = rng.gen_range(1..=3.min(levels));
        build_column(grid, row, col, height);
        count += 1;

        for quadrant in plot.quadrants() {
            if count >= target {
                break;
            }
            count = self.fill_center(grid, quadrant, target, count, rng);
        }
        count
    }

    fn scatter_obstacles(&self, grid: &mut VoxelGrid, density: f64, rng: &mut StdRng) {
        let (levels, rows, cols) = plan_extent(grid);
        let attempts = (grid.dimensions().cell_count() as f64 * density) as usize;

        let placed = (0..attempts)
            .filter(|_| {
                let c = Coordinate::new(
                    rng.gen_range(0..levels),
                    rng.gen_range(0..rows),
                    rng.gen_range(0..cols),
                );
                grid.add_obstacle(c)
            })
            .count();
        debug!("Placed {} of {} random obstacles", placed, attempts);
    }

    /// Cars only ever park on empty ground cells.
    fn park_cars(&self, grid: &mut VoxelGrid, count: u32, rng: &mut StdRng) {
        let (_, rows, cols) = plan_extent(grid);
        let mut parked = 0;

        for _ in 0..count * 10 {
            if parked >= count {
                break;
            }
            let c = Coordinate::new(0, rng.gen_range(0..rows), rng.gen_range(0..cols));
            if grid.cell(c) == Some(CellKind::Empty) && grid.add_car(c) {
                parked += 1;
            }
        }
        debug!("Parked {} of {} cars", parked, count);
    }
}

impl Generator<VoxelGrid> for CityGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> VoxResult<VoxelGrid> {
        for attempt in 1..=self.max_attempts.max(1) {
            let grid = self.build(config, rng)?;
            match self.validate(&grid, config) {
                Ok(()) => {
                    info!(
                        "Generated {} city (seed {}, attempt {}): {} obstacles, {} cars",
                        grid.dimensions(),
                        config.seed,
                        attempt,
                        grid.obstacle_count(),
                        grid.car_count()
                    );
                    return Ok(grid);
                }
                Err(e) => debug!("Discarding layout {}: {}", attempt, e),
            }
        }

        Err(VoxError::GenerationFailed(format!(
            "no routable layout after {} attempts",
            self.max_attempts
        )))
    }

    fn validate(&self, grid: &VoxelGrid, config: &GenerationConfig) -> VoxResult<()> {
        let start = grid
            .start()
            .ok_or_else(|| VoxError::GenerationFailed("city has no start".to_string()))?;
        let goal = grid
            .goal()
            .ok_or_else(|| VoxError::GenerationFailed("city has no goal".to_string()))?;

        if config.ensure_route && !grid.connected_component(start).contains(&goal) {
            return Err(VoxError::GenerationFailed(format!(
                "goal {} is not reachable from start {}",
                goal, start
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "CityGenerator"
    }
}

impl Default for CityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn plan_extent(grid: &VoxelGrid) -> (i32, i32, i32) {
    (grid.levels() as i32, grid.rows() as i32, grid.cols() as i32)
}

/// Stacks obstacles from the ground up to `height` levels.
fn build_column(grid: &mut VoxelGrid, row: i32, col: i32, height: i32) {
    for level in 0..height {
        grid.add_obstacle(Coordinate::new(level, row, col));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils;
    use crate::search::{Algorithm, SearchEngine};

    fn generate(config: &GenerationConfig) -> VoxelGrid {
        let mut rng = utils::create_rng(config);
        CityGenerator::new().generate(config, &mut rng).unwrap()
    }

    #[test]
    fn test_endpoints_are_fixed_and_free() {
        let config = GenerationConfig::new(12345);
        let grid = generate(&config);

        assert_eq!(grid.start(), Some(Coordinate::new(0, 2, 2)));
        assert_eq!(grid.goal(), Some(Coordinate::new(0, 32, 32)));
        assert_eq!(grid.cell(Coordinate::new(0, 2, 2)), Some(CellKind::Start));
        assert_eq!(grid.cell(Coordinate::new(0, 32, 32)), Some(CellKind::Goal));
    }

    #[test]
    fn test_same_seed_same_city() {
        let config = GenerationConfig::for_dense_city(777);
        let a = generate(&config);
        let b = generate(&config);

        let mut obstacles_a: Vec<_> = a.obstacles().collect();
        let mut obstacles_b: Vec<_> = b.obstacles().collect();
        obstacles_a.sort();
        obstacles_b.sort();
        assert_eq!(obstacles_a, obstacles_b);
        assert_eq!(a.car_count(), b.car_count());
        assert_eq!(a.elevation(10, 10), b.elevation(10, 10));
    }

    #[test]
    fn test_scattered_buildings_stay_inside_border() {
        let config = GenerationConfig::new(5);
        let grid = generate(&config);
        assert!(grid.obstacle_count() > 0);
        for c in grid.obstacles() {
            assert!((2..=32).contains(&c.row));
            assert!((2..=32).contains(&c.col));
        }
    }

    #[test]
    fn test_buildings_rise_from_the_ground() {
        let config = GenerationConfig {
            buildings: BuildingStrategy::Recursive,
            ..GenerationConfig::new(11)
        };
        let grid = generate(&config);
        assert!(grid.obstacle_count() > 40);
        for c in grid.obstacles() {
            for level in 0..c.level {
                let below = Coordinate::new(level, c.row, c.col);
                assert!(grid.is_obstacle(below) || grid.is_endpoint(below));
            }
        }
    }

    #[test]
    fn test_streets_cost_the_floor() {
        let config = GenerationConfig {
            buildings: BuildingStrategy::None,
            street_grid: true,
            ..GenerationConfig::new(1)
        };
        let grid = generate(&config);
        assert_eq!(grid.terrain_cost(Coordinate::new(0, 0, 17)), Some(1.0));
        assert_eq!(grid.terrain_cost(Coordinate::new(0, 13, 3)), Some(1.0));
        assert_eq!(grid.terrain_cost(Coordinate::new(0, 3, 3)), Some(3.0));
        assert_eq!(grid.terrain_cost(Coordinate::new(1, 3, 3)), Some(1.0));
    }

    #[test]
    fn test_cars_park_on_ground_only() {
        let config = GenerationConfig {
            car_count: 15,
            ..GenerationConfig::new(21)
        };
        let grid = generate(&config);
        assert!(grid.car_count() > 0);
        assert!(grid.car_count() <= 15);
        assert!(grid.cars().all(|c| c.level == 0));
        assert!(grid.cars().all(|c| !grid.is_endpoint(c)));
    }

    #[test]
    fn test_elevation_within_amplitude() {
        let config = GenerationConfig {
            elevation_amplitude: 2.5,
            ..GenerationConfig::for_testing(8)
        };
        let grid = generate(&config);
        for row in 0..12 {
            for col in 0..12 {
                let e = grid.elevation(row, col).unwrap();
                assert!((0.0..=2.5).contains(&e));
            }
        }
    }

    #[test]
    fn test_generated_city_is_routable() {
        let config = GenerationConfig::for_dense_city(2024);
        let grid = generate(&config);
        let result = SearchEngine::new(&grid)
            .run_endpoints(Algorithm::Dijkstra)
            .unwrap();
        assert!(result.is_found());
    }

    #[test]
    fn test_rejects_tiny_plans() {
        let config = GenerationConfig {
            rows: 5,
            ..GenerationConfig::for_testing(1)
        };
        let mut rng = utils::create_rng(&config);
        assert!(matches!(
            CityGenerator::new().generate(&config, &mut rng),
            Err(VoxError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_validate_requires_route() {
        let config = GenerationConfig::for_testing(1);
        let mut grid = VoxelGrid::new(1, 12, 12).unwrap();
        let generator = CityGenerator::new();
        assert!(matches!(
            generator.validate(&grid, &config),
            Err(VoxError::GenerationFailed(_))
        ));

        grid.set_start(Coordinate::new(0, 2, 2)).unwrap();
        grid.set_goal(Coordinate::new(0, 9, 9)).unwrap();
        assert!(generator.validate(&grid, &config).is_ok());

        for row in 0..12 {
            grid.add_obstacle(Coordinate::new(0, row, 5));
        }
        assert!(generator.validate(&grid, &config).is_err());

        let relaxed = GenerationConfig {
            ensure_route: false,
            ..config
        };
        assert!(generator.validate(&grid, &relaxed).is_ok());
    }

    #[test]
    fn test_plot_quadrants_cover_plot() {
        let plot = Plot {
            min_row: 5,
            max_row: 29,
            min_col: 5,
            max_col: 29,
        };
        let quadrants = plot.quadrants();
        assert_eq!(quadrants[0].max_row, 17);
        assert_eq!(quadrants[3].min_col, 17);
        assert!(!plot.is_too_small());
        assert!(Plot { max_row: 7, ..plot }.is_too_small());
    }
}
