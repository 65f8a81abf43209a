//! # Search Module
//!
//! Minimum-cost route search over a [`CostGrid`].
//!
//! Two best-first searches share every piece of machinery and differ only in
//! the frontier priority:
//! - [`SearchEngine::dijkstra`] orders by accumulated cost
//! - [`SearchEngine::a_star`] orders by accumulated cost plus a [`Heuristic`]
//!
//! Both discard stale frontier entries lazily, finish as soon as the goal is
//! popped and report the order in which nodes were finalized, so their
//! exploration counts can be compared directly on the same grid.

pub mod astar;
pub mod dijkstra;
mod frontier;

use crate::grid::{Coordinate, CostGrid, VoxelGrid};
use crate::{VoxError, VoxResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use frontier::SearchState;

/// Which search to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Dijkstra,
    AStar,
}

impl Algorithm {
    /// Both algorithms, in comparison order.
    pub const ALL: [Algorithm; 2] = [Algorithm::Dijkstra, Algorithm::AStar];

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::AStar => "A*",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Dijkstra => f.write_str("dijkstra"),
            Algorithm::AStar => f.write_str("a_star"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = VoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "a_star" | "astar" | "a*" => Ok(Algorithm::AStar),
            other => Err(VoxError::InvalidArgument(format!(
                "unknown algorithm '{}', expected dijkstra or a_star",
                other
            ))),
        }
    }
}

/// Goal-distance estimate used by A*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// `|Δlevel| + |Δrow| + |Δcol|`.
    ///
    /// Overestimates across planar diagonals, which cost one step but close
    /// two units of distance, so A* under it is fast but not always optimal.
    #[default]
    Manhattan,
    /// `|Δlevel| + max(|Δrow|, |Δcol|)` scaled by the grid's cheapest step.
    ///
    /// Never overestimates under the ten-direction move set, so A* returns
    /// optimal paths and finalizes no more nodes than Dijkstra.
    LevelChebyshev,
}

impl Heuristic {
    /// Estimated cost from `from` to `goal`.
    pub fn estimate(self, from: Coordinate, goal: Coordinate, min_step_cost: f64) -> f64 {
        match self {
            Heuristic::Manhattan => from.manhattan_distance(goal) as f64,
            Heuristic::LevelChebyshev => {
                from.level_chebyshev_distance(goal) as f64 * min_step_cost
            }
        }
    }
}

impl FromStr for Heuristic {
    type Err = VoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "level_chebyshev" | "chebyshev" => Ok(Heuristic::LevelChebyshev),
            other => Err(VoxError::InvalidArgument(format!(
                "unknown heuristic '{}', expected manhattan or level_chebyshev",
                other
            ))),
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Heuristic used by A*
    pub heuristic: Heuristic,
    /// Abort once more than this many nodes have been finalized
    pub max_expansions: Option<usize>,
}

impl SearchConfig {
    /// Configuration using the given heuristic.
    pub fn with_heuristic(heuristic: Heuristic) -> Self {
        Self {
            heuristic,
            ..Default::default()
        }
    }
}

/// Shared flag for aborting a running search from another thread.
///
/// Checked once per frontier pop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of every search holding this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Clears a previous cancellation so the token can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Scalar metrics of one search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Number of distinct nodes finalized
    pub nodes_explored: usize,
    /// Number of nodes on the returned path, 0 if none
    pub path_length: usize,
    /// Accumulated cost along the returned path, 0 if none
    pub path_cost: f64,
    /// Wall-clock duration of the run
    pub elapsed_seconds: f64,
}

/// Outcome of one search run. Never mutated after it is returned.
///
/// An empty `path` means no route exists; that is a valid result, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub algorithm: Algorithm,
    /// Start to goal inclusive
    pub path: Vec<Coordinate>,
    /// Nodes in the order they were finalized
    pub explored: Vec<Coordinate>,
    pub metrics: RunMetrics,
}

impl SearchResult {
    fn found(
        algorithm: Algorithm,
        path: Vec<Coordinate>,
        path_cost: f64,
        explored: Vec<Coordinate>,
        started: Instant,
    ) -> Self {
        Self {
            algorithm,
            metrics: RunMetrics {
                nodes_explored: explored.len(),
                path_length: path.len(),
                path_cost,
                elapsed_seconds: started.elapsed().as_secs_f64(),
            },
            path,
            explored,
        }
    }

    fn not_found(algorithm: Algorithm, explored: Vec<Coordinate>, started: Instant) -> Self {
        Self::found(algorithm, Vec::new(), 0.0, explored, started)
    }

    /// Whether a path was found.
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of moves along the path.
    pub fn edge_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Results of both algorithms on the same grid and endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub dijkstra: SearchResult,
    pub a_star: SearchResult,
}

impl Comparison {
    /// Both results in comparison order.
    pub fn results(&self) -> [&SearchResult; 2] {
        [&self.dijkstra, &self.a_star]
    }

    /// Result for a given algorithm.
    pub fn get(&self, algorithm: Algorithm) -> &SearchResult {
        match algorithm {
            Algorithm::Dijkstra => &self.dijkstra,
            Algorithm::AStar => &self.a_star,
        }
    }
}

/// Route search over a borrowed grid.
///
/// The grid is only read; all search state lives inside each call.
///
/// # Examples
///
/// ```
/// use voxroute::{Algorithm, Coordinate, SearchEngine, VoxelGrid};
///
/// let grid = VoxelGrid::new(3, 5, 5).unwrap();
/// let engine = SearchEngine::new(&grid);
/// let result = engine
///     .run(Algorithm::Dijkstra, Coordinate::new(0, 0, 0), Coordinate::new(0, 4, 4))
///     .unwrap();
/// assert_eq!(result.metrics.path_cost, 4.0);
/// assert_eq!(result.metrics.path_length, 5);
/// ```
pub struct SearchEngine<'g, G: CostGrid> {
    grid: &'g G,
    config: SearchConfig,
    cancel: Option<CancelToken>,
}

impl<'g, G: CostGrid> SearchEngine<'g, G> {
    /// Creates an engine with the default configuration.
    pub fn new(grid: &'g G) -> Self {
        Self::with_config(grid, SearchConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(grid: &'g G, config: SearchConfig) -> Self {
        Self {
            grid,
            config,
            cancel: None,
        }
    }

    /// Attaches a cancellation token checked once per frontier pop.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Configuration in effect.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the selected algorithm.
    pub fn run(
        &self,
        algorithm: Algorithm,
        start: Coordinate,
        goal: Coordinate,
    ) -> VoxResult<SearchResult> {
        match algorithm {
            Algorithm::Dijkstra => self.dijkstra(start, goal),
            Algorithm::AStar => self.a_star(start, goal),
        }
    }

    /// Runs both algorithms on the same endpoints.
    pub fn compare(&self, start: Coordinate, goal: Coordinate) -> VoxResult<Comparison> {
        Ok(Comparison {
            dijkstra: self.dijkstra(start, goal)?,
            a_star: self.a_star(start, goal)?,
        })
    }

    /// Fails fast when either endpoint is outside the grid or blocked.
    fn validate_endpoints(&self, start: Coordinate, goal: Coordinate) -> VoxResult<()> {
        for c in [start, goal] {
            if !self.grid.in_bounds(c) {
                return Err(VoxError::OutOfBounds {
                    coordinate: c,
                    dimensions: self.grid.dimensions(),
                });
            }
            if self.grid.is_obstacle(c) {
                return Err(VoxError::Blocked(c));
            }
        }
        Ok(())
    }

    fn check_cancelled(&self, state: &SearchState) -> VoxResult<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(VoxError::Cancelled {
                nodes_explored: state.nodes_explored(),
            });
        }
        Ok(())
    }

    fn check_expansion_limit(&self, state: &SearchState) -> VoxResult<()> {
        match self.config.max_expansions {
            Some(limit) if state.nodes_explored() > limit => {
                Err(VoxError::ExpansionLimit { limit })
            }
            _ => Ok(()),
        }
    }
}

impl SearchEngine<'_, VoxelGrid> {
    /// Runs the selected algorithm between the grid's own start and goal.
    pub fn run_endpoints(&self, algorithm: Algorithm) -> VoxResult<SearchResult> {
        let (start, goal) = self.endpoints()?;
        self.run(algorithm, start, goal)
    }

    /// Runs both algorithms between the grid's own start and goal.
    pub fn compare_endpoints(&self) -> VoxResult<Comparison> {
        let (start, goal) = self.endpoints()?;
        self.compare(start, goal)
    }

    fn endpoints(&self) -> VoxResult<(Coordinate, Coordinate)> {
        let start = self.grid.start().ok_or(VoxError::MissingEndpoint("start"))?;
        let goal = self.grid.goal().ok_or(VoxError::MissingEndpoint("goal"))?;
        Ok((start, goal))
    }
}

/// Sum of entry costs along a path, excluding the start cell.
pub fn path_cost<G: CostGrid>(grid: &G, path: &[Coordinate]) -> f64 {
    path.iter().skip(1).map(|&c| grid.cost(c)).sum()
}
