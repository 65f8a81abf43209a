//! Uniform-cost search.

use super::frontier::{FrontierEntry, SearchState};
use super::{Algorithm, SearchEngine, SearchResult};
use crate::grid::{Coordinate, CostGrid};
use crate::VoxResult;
use log::{debug, trace};
use std::collections::HashMap;
use std::time::Instant;

impl<G: CostGrid> SearchEngine<'_, G> {
    /// Finds a minimum-cost path with Dijkstra's algorithm.
    ///
    /// The frontier is keyed by accumulated cost. Entering a cell costs
    /// `grid.cost(cell)`; the start cell itself is free. The search ends when
    /// the goal is popped, not when it is first discovered.
    ///
    /// Returns an empty path when the goal is unreachable, after exploring the
    /// whole component containing the start.
    pub fn dijkstra(&self, start: Coordinate, goal: Coordinate) -> VoxResult<SearchResult> {
        self.validate_endpoints(start, goal)?;
        trace!("[Dijkstra] search: start={} goal={}", start, goal);
        let started = Instant::now();

        let mut state = SearchState::new();
        let mut cost_so_far: HashMap<Coordinate, f64> = HashMap::new();
        let mut neighbors = Vec::with_capacity(10);

        cost_so_far.insert(start, 0.0);
        state.push(0.0, start);

        while let Some(FrontierEntry {
            priority: current_cost,
            coordinate: current,
        }) = state.pop()
        {
            self.check_cancelled(&state)?;

            let best = cost_so_far.get(&current).copied().unwrap_or(f64::INFINITY);
            if current_cost > best {
                continue;
            }

            state.finalize(current);
            self.check_expansion_limit(&state)?;

            if current == goal {
                let path = state.reconstruct_path(goal);
                debug!(
                    "[Dijkstra] found path of {} nodes, cost {:.2}, after {} expansions",
                    path.len(),
                    current_cost,
                    state.nodes_explored()
                );
                return Ok(SearchResult::found(
                    Algorithm::Dijkstra,
                    path,
                    current_cost,
                    state.into_trace(),
                    started,
                ));
            }

            neighbors.clear();
            self.grid.neighbors_into(current, &mut neighbors);
            for &neighbor in &neighbors {
                let new_cost = current_cost + self.grid.cost(neighbor);
                let known = cost_so_far.get(&neighbor).copied().unwrap_or(f64::INFINITY);
                if new_cost < known {
                    cost_so_far.insert(neighbor, new_cost);
                    state.set_predecessor(neighbor, current);
                    state.push(new_cost, neighbor);
                }
            }
        }

        debug!(
            "[Dijkstra] no path after {} expansions",
            state.nodes_explored()
        );
        Ok(SearchResult::not_found(
            Algorithm::Dijkstra,
            state.into_trace(),
            started,
        ))
    }
}
