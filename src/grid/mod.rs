//! # Grid Module
//!
//! The voxel world the search engine runs over: coordinates, move directions,
//! cell classifications and the cost surface.
//!
//! This module contains the fundamental building blocks of the engine:
//! - [`Coordinate`] and the ten legal [`Direction`]s between cells
//! - [`CellKind`] classification used by the grid and the renderer
//! - [`CostGrid`], the read-only query interface searches borrow
//! - [`VoxelGrid`], the authoritative occupancy and cost model

pub mod voxel;

pub use voxel::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell address as (level, row, column).
///
/// Level 0 is the ground. Ordering compares level first, then row, then
/// column, which is also how equal-priority frontier entries are broken.
///
/// # Examples
///
/// ```
/// use voxroute::Coordinate;
///
/// let a = Coordinate::new(0, 1, 1);
/// let b = Coordinate::new(1, 3, 0);
/// assert_eq!(a.manhattan_distance(b), 4);
/// assert!(a < b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub level: i32,
    pub row: i32,
    pub col: i32,
}

impl Coordinate {
    /// Creates a new coordinate.
    pub const fn new(level: i32, row: i32, col: i32) -> Self {
        Self { level, row, col }
    }

    /// Returns the ground-level origin (0, 0, 0).
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Sum of absolute differences along all three axes.
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.level.abs_diff(other.level) + self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Vertical distance plus the planar Chebyshev distance.
    ///
    /// This is the exact step count between two cells on an empty grid under
    /// the ten-direction move set.
    pub fn level_chebyshev_distance(self, other: Coordinate) -> u32 {
        let planar = self.row.abs_diff(other.row).max(self.col.abs_diff(other.col));
        self.level.abs_diff(other.level) + planar
    }

    /// Returns the coordinate one step away in `direction`.
    pub fn step(self, direction: Direction) -> Coordinate {
        self + direction.to_delta()
    }

    /// Whether `other` is reachable from `self` with a single legal move.
    pub fn is_adjacent(self, other: Coordinate) -> bool {
        Direction::from_delta(other - self).is_some()
    }
}

impl std::ops::Add for Coordinate {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.level + other.level,
            self.row + other.row,
            self.col + other.col,
        )
    }
}

impl std::ops::Sub for Coordinate {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(
            self.level - other.level,
            self.row - other.row,
            self.col - other.col,
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.level, self.row, self.col)
    }
}

/// The ten legal moves between cells.
///
/// Six axis-aligned moves plus the four diagonals within a level. There are
/// no diagonal moves between levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    West,
    East,
    Down,
    Up,
    Northwest,
    Northeast,
    Southwest,
    Southeast,
}

impl Direction {
    /// All directions in neighbor generation order.
    pub const ALL: [Direction; 10] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
        Direction::Down,
        Direction::Up,
        Direction::Northwest,
        Direction::Northeast,
        Direction::Southwest,
        Direction::Southeast,
    ];

    /// Converts a direction to a coordinate delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use voxroute::{Coordinate, Direction};
    ///
    /// assert_eq!(Direction::Up.to_delta(), Coordinate::new(1, 0, 0));
    /// assert_eq!(Direction::Northeast.to_delta(), Coordinate::new(0, -1, 1));
    /// ```
    pub fn to_delta(self) -> Coordinate {
        match self {
            Direction::North => Coordinate::new(0, -1, 0),
            Direction::South => Coordinate::new(0, 1, 0),
            Direction::West => Coordinate::new(0, 0, -1),
            Direction::East => Coordinate::new(0, 0, 1),
            Direction::Down => Coordinate::new(-1, 0, 0),
            Direction::Up => Coordinate::new(1, 0, 0),
            Direction::Northwest => Coordinate::new(0, -1, -1),
            Direction::Northeast => Coordinate::new(0, -1, 1),
            Direction::Southwest => Coordinate::new(0, 1, -1),
            Direction::Southeast => Coordinate::new(0, 1, 1),
        }
    }

    /// Converts a coordinate delta to a direction.
    ///
    /// Returns None if the delta is not a single legal move.
    pub fn from_delta(delta: Coordinate) -> Option<Direction> {
        Self::ALL.into_iter().find(|d| d.to_delta() == delta)
    }

    /// Whether this move stays on the same level but changes both row and column.
    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::Northwest | Direction::Northeast | Direction::Southwest | Direction::Southeast
        )
    }
}

/// Fixed extent of a grid as levels × rows × columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    pub levels: u32,
    pub rows: u32,
    pub cols: u32,
}

impl GridDimensions {
    /// Creates a new set of dimensions.
    pub const fn new(levels: u32, rows: u32, cols: u32) -> Self {
        Self { levels, rows, cols }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.levels as usize * self.rows as usize * self.cols as usize
    }

    /// Number of cells on a single level.
    pub fn layer_size(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Whether all three indices fall inside the grid.
    pub fn contains(&self, c: Coordinate) -> bool {
        c.level >= 0
            && c.row >= 0
            && c.col >= 0
            && (c.level as u32) < self.levels
            && (c.row as u32) < self.rows
            && (c.col as u32) < self.cols
    }

    /// Flat index of a coordinate in level-major order.
    pub fn index(&self, c: Coordinate) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        Some(
            c.level as usize * self.layer_size()
                + c.row as usize * self.cols as usize
                + c.col as usize,
        )
    }

    /// Inverse of [`GridDimensions::index`].
    pub fn coordinate(&self, index: usize) -> Coordinate {
        let layer = self.layer_size();
        let level = index / layer;
        let rem = index % layer;
        Coordinate::new(
            level as i32,
            (rem / self.cols as usize) as i32,
            (rem % self.cols as usize) as i32,
        )
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.levels, self.rows, self.cols)
    }
}

/// Classification of a single cell.
///
/// Only [`CellKind::Obstacle`] and [`CellKind::Car`] block movement; the
/// remaining kinds are markers for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Obstacle,
    Start,
    Goal,
    Path,
    Explored,
    Car,
}

impl CellKind {
    /// Whether the cell is impassable.
    pub fn is_blocking(self) -> bool {
        matches!(self, CellKind::Obstacle | CellKind::Car)
    }

    /// Whether the cell only carries a search visualization mark.
    pub fn is_search_mark(self) -> bool {
        matches!(self, CellKind::Path | CellKind::Explored)
    }

    /// Glyph used by the terminal renderer.
    pub fn glyph(self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Obstacle => '#',
            CellKind::Start => 'S',
            CellKind::Goal => 'G',
            CellKind::Path => '*',
            CellKind::Explored => 'o',
            CellKind::Car => 'c',
        }
    }
}

/// Read-only queries a search needs from a grid.
pub trait CostGrid {
    /// Extent of the grid.
    fn dimensions(&self) -> GridDimensions;

    /// True iff the cell blocks movement. The only traversability gate.
    fn is_obstacle(&self, c: Coordinate) -> bool;

    /// Cost of entering `c`. Only meaningful for in-bounds, non-obstacle cells.
    fn cost(&self, c: Coordinate) -> f64;

    /// Lower bound on the cost of any single move.
    fn min_step_cost(&self) -> f64 {
        1.0
    }

    /// Whether `c` lies inside the grid.
    fn in_bounds(&self, c: Coordinate) -> bool {
        self.dimensions().contains(c)
    }

    /// Whether `c` can be entered.
    fn is_traversable(&self, c: Coordinate) -> bool {
        self.in_bounds(c) && !self.is_obstacle(c)
    }

    /// Appends the traversable neighbors of `c` to `buf` in [`Direction::ALL`] order.
    fn neighbors_into(&self, c: Coordinate, buf: &mut Vec<Coordinate>) {
        for direction in Direction::ALL {
            let next = c.step(direction);
            if self.is_traversable(next) {
                buf.push(next);
            }
        }
    }

    /// Traversable neighbors of `c` in [`Direction::ALL`] order.
    fn neighbors(&self, c: Coordinate) -> Vec<Coordinate> {
        let mut out = Vec::with_capacity(Direction::ALL.len());
        self.neighbors_into(c, &mut out);
        out
    }
}

/// Cost model parameters for a [`VoxelGrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Terrain cost assigned on creation, reset and obstacle removal
    pub default_terrain_cost: f64,
    /// Floor every stored terrain cost is clamped to
    pub min_terrain_cost: f64,
    /// Cost per unit of |elevation - level|
    pub elevation_penalty: f64,
}

impl GridConfig {
    /// Creates the default cost model.
    pub fn new() -> Self {
        Self {
            default_terrain_cost: crate::config::DEFAULT_TERRAIN_COST,
            min_terrain_cost: crate::config::MIN_TERRAIN_COST,
            elevation_penalty: crate::config::ELEVATION_PENALTY,
        }
    }

    /// Cost model with no elevation influence, for uniform-cost scenarios.
    pub fn flat() -> Self {
        Self {
            elevation_penalty: 0.0,
            ..Self::new()
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new()
    }
}
