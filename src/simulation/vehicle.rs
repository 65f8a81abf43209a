//! Continuous-position vehicle that drives along a found path.

use crate::grid::Coordinate;
use log::debug;
use serde::{Deserialize, Serialize};

/// Default distance moved along each axis per update.
pub const DEFAULT_VEHICLE_SPEED: f64 = 0.1;

/// Remaining Manhattan distance at which a waypoint counts as reached.
pub const ARRIVAL_THRESHOLD: f64 = 0.2;

/// Per-axis offsets smaller than this are treated as already aligned.
const AXIS_TOLERANCE: f64 = 0.05;

/// Fractional position as (level, row, col).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehiclePosition {
    pub level: f64,
    pub row: f64,
    pub col: f64,
}

impl VehiclePosition {
    /// Exact position of a cell.
    pub fn at(c: Coordinate) -> Self {
        Self {
            level: c.level as f64,
            row: c.row as f64,
            col: c.col as f64,
        }
    }

    /// Nearest cell.
    pub fn nearest_cell(&self) -> Coordinate {
        Coordinate::new(
            self.level.round() as i32,
            self.row.round() as i32,
            self.col.round() as i32,
        )
    }
}

/// Vehicle that follows a path one waypoint at a time.
///
/// Each update moves the vehicle by `speed` along every axis that is not yet
/// aligned with the current waypoint. After the last waypoint is reached the
/// vehicle stops and stays on it.
///
/// # Examples
///
/// ```
/// use voxroute::{Coordinate, Vehicle};
///
/// let mut vehicle = Vehicle::new(Coordinate::new(0, 0, 0));
/// vehicle.set_path(vec![Coordinate::new(0, 0, 0), Coordinate::new(0, 0, 1)]);
/// while vehicle.is_moving() {
///     vehicle.update();
/// }
/// assert_eq!(vehicle.position().nearest_cell(), Coordinate::new(0, 0, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    position: VehiclePosition,
    path: Vec<Coordinate>,
    waypoint_index: usize,
    moving: bool,
    speed: f64,
    /// Radians, from atan2 of column over row motion
    heading: f64,
}

impl Vehicle {
    /// Creates a parked vehicle.
    pub fn new(at: Coordinate) -> Self {
        Self::with_speed(at, DEFAULT_VEHICLE_SPEED)
    }

    /// Creates a parked vehicle with a custom per-update speed.
    pub fn with_speed(at: Coordinate, speed: f64) -> Self {
        Self {
            position: VehiclePosition::at(at),
            path: Vec::new(),
            waypoint_index: 0,
            moving: false,
            speed,
            heading: 0.0,
        }
    }

    /// Starts following `path` from its first node.
    ///
    /// An empty path is ignored and the vehicle keeps its current state.
    pub fn set_path(&mut self, path: Vec<Coordinate>) {
        let Some(&first) = path.first() else {
            debug!("Ignoring empty vehicle path");
            return;
        };
        self.position = VehiclePosition::at(first);
        self.path = path;
        self.waypoint_index = 0;
        self.moving = true;
    }

    /// Advances the vehicle by one tick.
    pub fn update(&mut self) {
        if !self.moving {
            return;
        }
        let Some(&target) = self.path.get(self.waypoint_index) else {
            self.moving = false;
            return;
        };

        let dz = target.level as f64 - self.position.level;
        let dr = target.row as f64 - self.position.row;
        let dc = target.col as f64 - self.position.col;

        self.position.level += self.axis_step(dz);
        self.position.row += self.axis_step(dr);
        self.position.col += self.axis_step(dc);

        if dc.abs() > 0.01 || dr.abs() > 0.01 {
            self.heading = dc.atan2(dr);
        }

        if dz.abs() + dr.abs() + dc.abs() < ARRIVAL_THRESHOLD {
            self.waypoint_index += 1;
            if self.waypoint_index >= self.path.len() {
                self.moving = false;
                self.waypoint_index = self.path.len() - 1;
            }
        }
    }

    /// Halts in place, keeping the path.
    pub fn stop(&mut self) {
        self.moving = false;
    }

    /// Drops the path and halts. The position is kept.
    pub fn reset(&mut self) {
        self.path.clear();
        self.waypoint_index = 0;
        self.moving = false;
    }

    /// Moves the vehicle to a cell without following a path.
    pub fn place(&mut self, at: Coordinate) {
        self.reset();
        self.position = VehiclePosition::at(at);
    }

    pub fn position(&self) -> VehiclePosition {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Index of the waypoint currently being approached.
    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    fn axis_step(&self, delta: f64) -> f64 {
        if delta.abs() > AXIS_TOLERANCE {
            self.speed.copysign(delta)
        } else {
            0.0
        }
    }
}
