//! A* search.

use super::frontier::{FrontierEntry, SearchState};
use super::{Algorithm, SearchEngine, SearchResult};
use crate::grid::{Coordinate, CostGrid};
use crate::VoxResult;
use log::{debug, trace};
use std::collections::HashMap;
use std::time::Instant;

impl<G: CostGrid> SearchEngine<'_, G> {
    /// Finds a path with A*, ordering the frontier by `g + h`.
    ///
    /// Bookkeeping matches [`SearchEngine::dijkstra`] exactly: the same lazy
    /// discard of stale entries, the same termination on popping the goal and
    /// the same exploration trace. Only the priority differs, so exploration
    /// counts of the two are directly comparable.
    ///
    /// With the default [`Heuristic::Manhattan`](super::Heuristic::Manhattan)
    /// the returned path can cost more than the optimum when planar diagonals
    /// are involved; [`Heuristic::LevelChebyshev`](super::Heuristic::LevelChebyshev)
    /// keeps it optimal.
    pub fn a_star(&self, start: Coordinate, goal: Coordinate) -> VoxResult<SearchResult> {
        self.validate_endpoints(start, goal)?;
        trace!(
            "[AStar] search: start={} goal={} heuristic={:?}",
            start,
            goal,
            self.config.heuristic
        );
        let started = Instant::now();

        let heuristic = self.config.heuristic;
        let step_floor = self.grid.min_step_cost();
        let h = |c: Coordinate| heuristic.estimate(c, goal, step_floor);

        let mut state = SearchState::new();
        let mut g_score: HashMap<Coordinate, f64> = HashMap::new();
        let mut f_score: HashMap<Coordinate, f64> = HashMap::new();
        let mut neighbors = Vec::with_capacity(10);

        let f_start = h(start);
        g_score.insert(start, 0.0);
        f_score.insert(start, f_start);
        state.push(f_start, start);

        while let Some(FrontierEntry {
            priority: current_f,
            coordinate: current,
        }) = state.pop()
        {
            self.check_cancelled(&state)?;

            let best_f = f_score.get(&current).copied().unwrap_or(f64::INFINITY);
            if current_f > best_f {
                continue;
            }

            state.finalize(current);
            self.check_expansion_limit(&state)?;

            let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);

            if current == goal {
                let path = state.reconstruct_path(goal);
                debug!(
                    "[AStar] found path of {} nodes, cost {:.2}, after {} expansions",
                    path.len(),
                    current_g,
                    state.nodes_explored()
                );
                return Ok(SearchResult::found(
                    Algorithm::AStar,
                    path,
                    current_g,
                    state.into_trace(),
                    started,
                ));
            }

            neighbors.clear();
            self.grid.neighbors_into(current, &mut neighbors);
            for &neighbor in &neighbors {
                let tentative_g = current_g + self.grid.cost(neighbor);
                let known = g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY);
                if tentative_g < known {
                    let f = tentative_g + h(neighbor);
                    state.set_predecessor(neighbor, current);
                    g_score.insert(neighbor, tentative_g);
                    f_score.insert(neighbor, f);
                    state.push(f, neighbor);
                }
            }
        }

        debug!("[AStar] no path after {} expansions", state.nodes_explored());
        Ok(SearchResult::not_found(
            Algorithm::AStar,
            state.into_trace(),
            started,
        ))
    }
}
