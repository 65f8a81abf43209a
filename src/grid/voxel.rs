//! # Voxel Grid
//!
//! Authoritative occupancy and cost surface for a layered city.
//!
//! The grid owns three parallel stores: a classification per cell, a terrain
//! cost per cell and a ground elevation per (row, column) column. All point
//! queries are O(1) lookups into flat vectors.

use super::{CellKind, Coordinate, CostGrid, GridConfig, GridDimensions};
use crate::{VoxError, VoxResult};
use log::debug;
use pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Layered 3D occupancy grid with terrain costs and ground elevation.
///
/// Exactly one cell may be the start and exactly one the goal. Obstacles and
/// cars can never be placed on either of them, and neither can be placed on an
/// obstacle or car.
///
/// # Examples
///
/// ```
/// use voxroute::{CellKind, Coordinate, VoxelGrid};
///
/// let mut grid = VoxelGrid::new(2, 4, 4).unwrap();
/// let start = Coordinate::new(0, 0, 0);
/// grid.set_start(start).unwrap();
///
/// // Obstacles never overwrite the active start.
/// assert!(!grid.add_obstacle(start));
/// assert_eq!(grid.cell(start), Some(CellKind::Start));
/// assert!(!grid.is_obstacle(start));
/// ```
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    dims: GridDimensions,
    config: GridConfig,
    cells: Vec<CellKind>,
    terrain: Vec<f64>,
    /// Indexed by (row, col); shared by every level
    elevation: Vec<f64>,
    start: Option<Coordinate>,
    goal: Option<Coordinate>,
    obstacles: HashSet<Coordinate>,
    cars: HashSet<Coordinate>,
}

impl VoxelGrid {
    /// Creates an empty grid with the default cost model.
    pub fn new(levels: u32, rows: u32, cols: u32) -> VoxResult<Self> {
        Self::with_config(GridDimensions::new(levels, rows, cols), GridConfig::default())
    }

    /// Creates an empty grid with an explicit cost model.
    pub fn with_config(dims: GridDimensions, config: GridConfig) -> VoxResult<Self> {
        if dims.cell_count() == 0 {
            return Err(VoxError::InvalidDimensions(format!(
                "grid {} has no cells",
                dims
            )));
        }
        if !(config.min_terrain_cost.is_finite() && config.min_terrain_cost > 0.0) {
            return Err(VoxError::InvalidArgument(format!(
                "terrain cost floor must be positive, got {}",
                config.min_terrain_cost
            )));
        }
        if !(config.elevation_penalty.is_finite() && config.elevation_penalty >= 0.0) {
            return Err(VoxError::InvalidArgument(format!(
                "elevation penalty must be non-negative, got {}",
                config.elevation_penalty
            )));
        }

        let default_cost = config.default_terrain_cost.max(config.min_terrain_cost);
        let config = GridConfig {
            default_terrain_cost: default_cost,
            ..config
        };

        Ok(Self {
            dims,
            cells: vec![CellKind::Empty; dims.cell_count()],
            terrain: vec![default_cost; dims.cell_count()],
            elevation: vec![0.0; dims.layer_size()],
            config,
            start: None,
            goal: None,
            obstacles: HashSet::new(),
            cars: HashSet::new(),
        })
    }

    /// Grid extent.
    pub fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    /// Number of vertical levels.
    pub fn levels(&self) -> u32 {
        self.dims.levels
    }

    /// Number of rows per level.
    pub fn rows(&self) -> u32 {
        self.dims.rows
    }

    /// Number of columns per level.
    pub fn cols(&self) -> u32 {
        self.dims.cols
    }

    /// Cost model in effect.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Whether `c` lies inside the grid.
    pub fn in_bounds(&self, c: Coordinate) -> bool {
        self.dims.contains(c)
    }

    /// Current start coordinate.
    pub fn start(&self) -> Option<Coordinate> {
        self.start
    }

    /// Current goal coordinate.
    pub fn goal(&self) -> Option<Coordinate> {
        self.goal
    }

    /// Whether `c` is the active start or goal.
    pub fn is_endpoint(&self, c: Coordinate) -> bool {
        self.start == Some(c) || self.goal == Some(c)
    }

    /// Classification of a cell, or None when out of bounds.
    pub fn cell(&self, c: Coordinate) -> Option<CellKind> {
        self.dims.index(c).map(|i| self.cells[i])
    }

    /// Stored terrain cost of a cell, without the elevation penalty.
    pub fn terrain_cost(&self, c: Coordinate) -> Option<f64> {
        self.dims.index(c).map(|i| self.terrain[i])
    }

    /// Ground elevation of a (row, col) column.
    pub fn elevation(&self, row: i32, col: i32) -> Option<f64> {
        self.elevation_index(row, col).map(|i| self.elevation[i])
    }

    /// True iff the cell is classified as an obstacle or a car.
    ///
    /// Out-of-bounds coordinates are reported as not blocked; bounds are a
    /// separate check.
    pub fn is_obstacle(&self, c: Coordinate) -> bool {
        self.cell(c).is_some_and(CellKind::is_blocking)
    }

    /// Cost of entering `c`: terrain cost plus the elevation penalty.
    ///
    /// Only defined for in-bounds, non-obstacle cells. Out-of-bounds
    /// coordinates cost infinity.
    pub fn cost(&self, c: Coordinate) -> f64 {
        let Some(index) = self.dims.index(c) else {
            return f64::INFINITY;
        };
        let ground = self.elevation[index % self.dims.layer_size()];
        self.terrain[index] + self.config.elevation_penalty * (ground - c.level as f64).abs()
    }

    /// Moves the start marker to `c`.
    ///
    /// The previous start cell reverts to empty only if it still shows the
    /// start marker.
    pub fn set_start(&mut self, c: Coordinate) -> VoxResult<()> {
        let previous = self.start;
        self.place_marker(c, previous, CellKind::Start)?;
        self.start = Some(c);
        Ok(())
    }

    /// Moves the goal marker to `c`.
    ///
    /// The previous goal cell reverts to empty only if it still shows the
    /// goal marker.
    pub fn set_goal(&mut self, c: Coordinate) -> VoxResult<()> {
        let previous = self.goal;
        self.place_marker(c, previous, CellKind::Goal)?;
        self.goal = Some(c);
        Ok(())
    }

    fn place_marker(
        &mut self,
        c: Coordinate,
        previous: Option<Coordinate>,
        marker: CellKind,
    ) -> VoxResult<()> {
        let index = self.checked_index(c)?;
        if self.cells[index].is_blocking() {
            return Err(VoxError::Blocked(c));
        }

        if let Some(old_index) = previous.and_then(|old| self.dims.index(old)) {
            if self.cells[old_index] == marker {
                self.cells[old_index] = CellKind::Empty;
            }
        }
        self.cells[index] = marker;
        Ok(())
    }

    /// Places a building obstacle. Returns false if rejected.
    ///
    /// Rejected when `c` is out of bounds or is the active start or goal.
    pub fn add_obstacle(&mut self, c: Coordinate) -> bool {
        self.place_blocker(c, CellKind::Obstacle)
    }

    /// Places a vehicle obstacle. Returns false if rejected.
    ///
    /// The grid itself does not restrict cars to the ground level; callers
    /// that want that policy enforce it before calling.
    pub fn add_car(&mut self, c: Coordinate) -> bool {
        self.place_blocker(c, CellKind::Car)
    }

    fn place_blocker(&mut self, c: Coordinate, kind: CellKind) -> bool {
        let Some(index) = self.dims.index(c) else {
            debug!("Ignoring {:?} outside grid at {}", kind, c);
            return false;
        };
        if self.is_endpoint(c) {
            debug!("Refusing to place {:?} on endpoint {}", kind, c);
            return false;
        }

        self.obstacles.remove(&c);
        self.cars.remove(&c);
        if kind == CellKind::Car {
            self.cars.insert(c);
        } else {
            self.obstacles.insert(c);
        }
        self.cells[index] = kind;
        true
    }

    /// Clears an obstacle or car and resets the cell's terrain cost.
    ///
    /// Returns false if there was nothing to remove.
    pub fn remove_obstacle(&mut self, c: Coordinate) -> bool {
        let Some(index) = self.dims.index(c) else {
            return false;
        };
        let removed_obstacle = self.obstacles.remove(&c);
        let removed_car = self.cars.remove(&c);
        if !(removed_obstacle || removed_car) {
            return false;
        }

        self.cells[index] = CellKind::Empty;
        self.terrain[index] = self.config.default_terrain_cost;
        true
    }

    /// Sets the terrain cost of a traversable cell.
    ///
    /// Returns `Ok(false)` without changes when the cell is an obstacle.
    /// Values below the configured floor are raised to it.
    pub fn set_terrain_cost(&mut self, c: Coordinate, value: f64) -> VoxResult<bool> {
        let index = self.checked_index(c)?;
        if !(value.is_finite() && value > 0.0) {
            return Err(VoxError::InvalidCost {
                coordinate: c,
                value,
            });
        }
        if self.cells[index].is_blocking() {
            debug!("Ignoring terrain cost {} on obstacle {}", value, c);
            return Ok(false);
        }

        self.terrain[index] = value.max(self.config.min_terrain_cost);
        Ok(true)
    }

    /// Sets the ground elevation of a (row, col) column.
    pub fn set_elevation(&mut self, row: i32, col: i32, value: f64) -> VoxResult<()> {
        let index = self
            .elevation_index(row, col)
            .ok_or(VoxError::OutOfBounds {
                coordinate: Coordinate::new(0, row, col),
                dimensions: self.dims,
            })?;
        if !value.is_finite() {
            return Err(VoxError::InvalidArgument(format!(
                "elevation at ({}, {}) must be finite, got {}",
                row, col, value
            )));
        }
        self.elevation[index] = value;
        Ok(())
    }

    /// Returns every array to its initial state and clears start and goal.
    pub fn reset(&mut self) {
        self.cells.fill(CellKind::Empty);
        self.terrain.fill(self.config.default_terrain_cost);
        self.elevation.fill(0.0);
        self.start = None;
        self.goal = None;
        self.obstacles.clear();
        self.cars.clear();
    }

    /// Clears every Path and Explored mark, then restamps start and goal.
    pub fn clear_search_marks(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_search_mark()) {
            *cell = CellKind::Empty;
        }

        for (endpoint, marker) in [(self.start, CellKind::Start), (self.goal, CellKind::Goal)] {
            if let Some(index) = endpoint.and_then(|c| self.dims.index(c)) {
                self.cells[index] = marker;
            }
        }
    }

    /// Stamps empty cells from an exploration trace as explored.
    ///
    /// Purely cosmetic. Returns how many cells were stamped.
    pub fn mark_explored(&mut self, nodes: &[Coordinate]) -> usize {
        let mut marked = 0;
        for &c in nodes {
            if let Some(index) = self.dims.index(c) {
                if self.cells[index] == CellKind::Empty {
                    self.cells[index] = CellKind::Explored;
                    marked += 1;
                }
            }
        }
        debug!("Marked {} of {} cells as explored", marked, nodes.len());
        marked
    }

    /// Stamps a path onto the grid, skipping start, goal and blocked cells.
    ///
    /// Purely cosmetic. Returns how many cells were stamped.
    pub fn mark_path(&mut self, path: &[Coordinate]) -> usize {
        let mut marked = 0;
        for &c in path {
            if self.is_endpoint(c) {
                continue;
            }
            if let Some(index) = self.dims.index(c) {
                if !self.cells[index].is_blocking() {
                    self.cells[index] = CellKind::Path;
                    marked += 1;
                }
            }
        }
        marked
    }

    /// Every traversable cell reachable from `from`, including `from` itself.
    ///
    /// Empty when `from` is out of bounds or blocked.
    pub fn connected_component(&self, from: Coordinate) -> Vec<Coordinate> {
        if !self.is_traversable(from) {
            return Vec::new();
        }
        bfs_reach(from, |c| self.neighbors(*c)).collect()
    }

    /// Number of building obstacles.
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Number of vehicle obstacles.
    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    /// Building obstacle coordinates, in no particular order.
    pub fn obstacles(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.obstacles.iter().copied()
    }

    /// Vehicle obstacle coordinates, in no particular order.
    pub fn cars(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cars.iter().copied()
    }

    /// Number of cells with the given classification.
    pub fn count_kind(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    fn checked_index(&self, c: Coordinate) -> VoxResult<usize> {
        self.dims.index(c).ok_or(VoxError::OutOfBounds {
            coordinate: c,
            dimensions: self.dims,
        })
    }

    fn elevation_index(&self, row: i32, col: i32) -> Option<usize> {
        self.dims.index(Coordinate::new(0, row, col))
    }
}

impl CostGrid for VoxelGrid {
    fn dimensions(&self) -> GridDimensions {
        self.dims
    }

    fn is_obstacle(&self, c: Coordinate) -> bool {
        VoxelGrid::is_obstacle(self, c)
    }

    fn cost(&self, c: Coordinate) -> f64 {
        VoxelGrid::cost(self, c)
    }

    fn min_step_cost(&self) -> f64 {
        self.config.min_terrain_cost
    }
}
