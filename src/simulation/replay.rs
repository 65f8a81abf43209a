//! Step-by-step replay of a search onto a grid.

use crate::grid::{Coordinate, VoxelGrid};
use crate::search::SearchResult;
use log::debug;

/// What a single replay step did.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayStep {
    /// The next node of the exploration trace was revealed
    Explored(Coordinate),
    /// The trace is exhausted and the path has been stamped
    PathReady(Vec<Coordinate>),
    /// Nothing left to replay
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Exploring,
    Path,
    Finished,
}

/// Reveals a search's exploration trace one node per step, then its path.
///
/// The replay owns copies of the trace and path, so the [`SearchResult`] it
/// was built from can be dropped. Marks are written to whatever grid is
/// passed to [`SearchReplay::step`].
///
/// # Examples
///
/// ```
/// use voxroute::{Coordinate, ReplayStep, SearchEngine, SearchReplay, VoxelGrid};
///
/// let mut grid = VoxelGrid::new(1, 3, 3).unwrap();
/// let result = SearchEngine::new(&grid)
///     .dijkstra(Coordinate::new(0, 0, 0), Coordinate::new(0, 0, 1))
///     .unwrap();
///
/// let mut replay = SearchReplay::new(&result);
/// assert_eq!(replay.step(&mut grid), ReplayStep::Explored(Coordinate::new(0, 0, 0)));
/// ```
#[derive(Debug, Clone)]
pub struct SearchReplay {
    explored: Vec<Coordinate>,
    path: Vec<Coordinate>,
    cursor: usize,
    phase: Phase,
}

impl SearchReplay {
    /// Creates a replay of a finished search.
    pub fn new(result: &SearchResult) -> Self {
        Self::from_parts(result.explored.clone(), result.path.clone())
    }

    /// Creates a replay from a raw trace and path.
    pub fn from_parts(explored: Vec<Coordinate>, path: Vec<Coordinate>) -> Self {
        Self {
            explored,
            path,
            cursor: 0,
            phase: Phase::Exploring,
        }
    }

    /// Advances by one node and stamps it onto `grid`.
    pub fn step(&mut self, grid: &mut VoxelGrid) -> ReplayStep {
        match self.phase {
            Phase::Exploring => {
                if let Some(&c) = self.explored.get(self.cursor) {
                    self.cursor += 1;
                    grid.mark_explored(&[c]);
                    return ReplayStep::Explored(c);
                }
                self.phase = Phase::Path;
                self.step(grid)
            }
            Phase::Path => {
                self.phase = Phase::Finished;
                if self.path.is_empty() {
                    debug!("Replay finished without a path");
                    return ReplayStep::Done;
                }
                grid.mark_path(&self.path);
                ReplayStep::PathReady(self.path.clone())
            }
            Phase::Finished => ReplayStep::Done,
        }
    }

    /// Replays everything that is left and returns the number of steps taken.
    pub fn run_to_end(&mut self, grid: &mut VoxelGrid) -> usize {
        let mut steps = 0;
        while self.step(grid) != ReplayStep::Done {
            steps += 1;
        }
        steps
    }

    /// Number of trace nodes revealed so far and the trace length.
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.explored.len())
    }

    /// Whether every step has been taken.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Starts the replay over. Marks already on a grid are left alone.
    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.phase = Phase::Exploring;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellKind;
    use crate::search::SearchEngine;

    fn setup() -> (VoxelGrid, SearchResult) {
        let mut grid = VoxelGrid::new(1, 3, 4).unwrap();
        grid.set_start(Coordinate::new(0, 1, 0)).unwrap();
        grid.set_goal(Coordinate::new(0, 1, 3)).unwrap();
        let result = SearchEngine::new(&grid)
            .dijkstra(Coordinate::new(0, 1, 0), Coordinate::new(0, 1, 3))
            .unwrap();
        (grid, result)
    }

    #[test]
    fn test_replay_reveals_trace_in_order() {
        let (mut grid, result) = setup();
        let mut replay = SearchReplay::new(&result);

        for &expected in &result.explored {
            assert_eq!(replay.step(&mut grid), ReplayStep::Explored(expected));
        }
        assert_eq!(replay.progress(), (result.explored.len(), result.explored.len()));
        assert_eq!(
            replay.step(&mut grid),
            ReplayStep::PathReady(result.path.clone())
        );
        assert!(replay.is_finished());
        assert_eq!(replay.step(&mut grid), ReplayStep::Done);
    }

    #[test]
    fn test_replay_stamps_grid() {
        let (mut grid, result) = setup();
        let steps = SearchReplay::new(&result).run_to_end(&mut grid);
        assert_eq!(steps, result.explored.len() + 1);

        assert_eq!(grid.cell(Coordinate::new(0, 1, 0)), Some(CellKind::Start));
        assert_eq!(grid.cell(Coordinate::new(0, 1, 3)), Some(CellKind::Goal));
        assert_eq!(grid.count_kind(CellKind::Path), result.path.len() - 2);
        assert!(grid.count_kind(CellKind::Explored) > 0);
    }

    #[test]
    fn test_replay_without_path_ends_after_trace() {
        let trace = vec![Coordinate::new(0, 0, 0), Coordinate::new(0, 0, 1)];
        let mut grid = VoxelGrid::new(1, 2, 2).unwrap();
        let mut replay = SearchReplay::from_parts(trace, Vec::new());

        assert_eq!(replay.run_to_end(&mut grid), 2);
        assert!(replay.is_finished());
        assert_eq!(grid.count_kind(CellKind::Explored), 2);
    }

    #[test]
    fn test_rewind() {
        let (mut grid, result) = setup();
        let mut replay = SearchReplay::new(&result);
        replay.run_to_end(&mut grid);
        replay.rewind();
        assert!(!replay.is_finished());
        assert_eq!(replay.progress().0, 0);
        assert_eq!(
            replay.step(&mut grid),
            ReplayStep::Explored(result.explored[0])
        );
    }
}
