//! # Voxroute
//!
//! Shortest-path search over a layered 3D voxel city.
//!
//! ## Architecture Overview
//!
//! The crate is built around a small pathfinding engine and the collaborators that
//! feed it and consume its output:
//!
//! - **Grid**: the voxel occupancy and cost surface ([`VoxelGrid`]) plus the
//!   read-only [`CostGrid`] query trait the search runs against
//! - **Search**: uniform-cost (Dijkstra) and A* search producing a path, an
//!   exploration trace and run metrics ([`SearchEngine`], [`SearchResult`])
//! - **Generation**: seeded procedural city layouts ([`CityGenerator`])
//! - **Simulation**: trace replay and vehicle movement along a found route
//! - **Rendering**: plain-text level views and metric tables for the terminal
//!
//! ## Example
//!
//! ```
//! use voxroute::{Coordinate, SearchEngine, VoxelGrid};
//!
//! let mut grid = VoxelGrid::new(3, 5, 5).unwrap();
//! grid.add_obstacle(Coordinate::new(0, 1, 1));
//!
//! let engine = SearchEngine::new(&grid);
//! let result = engine
//!     .a_star(Coordinate::new(0, 0, 0), Coordinate::new(0, 4, 4))
//!     .unwrap();
//! assert_eq!(result.path.first(), Some(&Coordinate::new(0, 0, 0)));
//! assert_eq!(result.path.last(), Some(&Coordinate::new(0, 4, 4)));
//! ```

pub mod generation;
pub mod grid;
pub mod rendering;
pub mod search;
pub mod simulation;

pub use generation::*;
pub use grid::*;
pub use rendering::*;
pub use search::*;
pub use simulation::*;

/// Core error type for the voxroute engine.
#[derive(thiserror::Error, Debug)]
pub enum VoxError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Coordinate lies outside the grid
    #[error("coordinate {coordinate} is outside grid {dimensions}")]
    OutOfBounds {
        coordinate: Coordinate,
        dimensions: GridDimensions,
    },

    /// Coordinate is occupied by an obstacle or car
    #[error("coordinate {0} is blocked")]
    Blocked(Coordinate),

    /// Start or goal has not been placed
    #[error("no {0} has been set on the grid")]
    MissingEndpoint(&'static str),

    /// Grid dimensions are unusable
    #[error("invalid grid dimensions: {0}")]
    InvalidDimensions(String),

    /// Terrain cost is not a finite positive number
    #[error("invalid terrain cost {value} at {coordinate}")]
    InvalidCost { coordinate: Coordinate, value: f64 },

    /// Search was aborted before it finished
    #[error("search cancelled after {nodes_explored} finalized nodes")]
    Cancelled { nodes_explored: usize },

    /// Search finalized more nodes than its configured limit
    #[error("search exceeded its limit of {limit} finalized nodes")]
    ExpansionLimit { limit: usize },

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A textual argument could not be parsed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type used throughout the voxroute codebase.
pub type VoxResult<T> = Result<T, VoxError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default number of vertical levels
    pub const DEFAULT_LEVELS: u32 = 5;

    /// Default number of rows per level
    pub const DEFAULT_ROWS: u32 = 35;

    /// Default number of columns per level
    pub const DEFAULT_COLS: u32 = 35;

    /// Terrain cost of a freshly created or cleared cell
    pub const DEFAULT_TERRAIN_COST: f64 = 1.0;

    /// Lowest terrain cost a traversable cell may carry
    pub const MIN_TERRAIN_COST: f64 = 1.0;

    /// Cost added per unit of distance between ground elevation and level
    pub const ELEVATION_PENALTY: f64 = 0.5;

    /// Seed used when none is supplied
    pub const DEFAULT_SEED: u64 = 12345;
}
