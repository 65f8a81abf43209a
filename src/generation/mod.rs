//! # Generation Module
//!
//! Seeded procedural layouts for the voxel city.
//!
//! Generation is fully reproducible: the same [`GenerationConfig`] and seed
//! always yield the same buildings, streets, cars and elevation.

pub mod city;

pub use city::*;

use crate::grid::GridConfig;
use crate::VoxResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How buildings are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingStrategy {
    /// No buildings at all
    None,
    /// A handful of single-column towers at random positions
    #[default]
    Scattered,
    /// A ring of towers just inside the border, then a quadrant-recursive
    /// fill of low buildings in the center
    Recursive,
}

/// Configuration for procedural city generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Number of vertical levels
    pub levels: u32,
    /// Rows per level
    pub rows: u32,
    /// Columns per level
    pub cols: u32,
    /// Cost model of the generated grid
    pub grid: GridConfig,
    /// Building layout
    pub buildings: BuildingStrategy,
    /// Fraction of all cells to attempt to fill with random obstacles (0.0 to 1.0)
    pub obstacle_density: f64,
    /// Whether to lay a street grid on the ground level
    pub street_grid: bool,
    /// Distance between the first rows/columns of consecutive streets
    pub street_spacing: u32,
    /// Width of each street in cells
    pub street_width: u32,
    /// Ground cost of cells that are not on a street
    pub off_road_cost: f64,
    /// Number of parked cars to place on the ground level
    pub car_count: u32,
    /// Highest ground elevation; 0.0 keeps the terrain flat
    pub elevation_amplitude: f64,
    /// Sampling step of the elevation noise per cell
    pub elevation_scale: f64,
    /// Whether the goal must be reachable from the start
    pub ensure_route: bool,
}

impl GenerationConfig {
    /// Creates the default generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxroute::{BuildingStrategy, GenerationConfig};
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.buildings, BuildingStrategy::Scattered);
    /// assert!(config.rows >= 6 && config.cols >= 6);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            levels: crate::config::DEFAULT_LEVELS,
            rows: crate::config::DEFAULT_ROWS,
            cols: crate::config::DEFAULT_COLS,
            grid: GridConfig::new(),
            buildings: BuildingStrategy::Scattered,
            obstacle_density: 0.0,
            street_grid: false,
            street_spacing: 6,
            street_width: 2,
            off_road_cost: 3.0,
            car_count: 0,
            elevation_amplitude: 0.0,
            elevation_scale: 0.15,
            ensure_route: true,
        }
    }

    /// Creates a configuration for testing with a small, sparse city.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            levels: 3,
            rows: 12,
            cols: 12,
            ..Self::new(seed)
        }
    }

    /// Creates a configuration for a crowded city with streets, traffic and hills.
    pub fn for_dense_city(seed: u64) -> Self {
        Self {
            buildings: BuildingStrategy::Recursive,
            obstacle_density: 0.05,
            street_grid: true,
            car_count: 20,
            elevation_amplitude: 2.0,
            ..Self::new(seed)
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_SEED)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> VoxResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> VoxResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}
