//! Transient bookkeeping shared by both search algorithms.

use crate::grid::Coordinate;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Entry in the search frontier.
///
/// Duplicate entries for the same coordinate are expected; the algorithms
/// discard stale ones when they are popped.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrontierEntry {
    pub priority: f64,
    pub coordinate: Coordinate,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior in BinaryHeap; equal
        // priorities pop the smallest coordinate first
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.coordinate.cmp(&self.coordinate))
    }
}

/// Frontier, predecessor map, finalized set and exploration trace for one run.
///
/// Owned exclusively by a single search call and dropped when it returns.
#[derive(Debug, Default)]
pub(crate) struct SearchState {
    frontier: BinaryHeap<FrontierEntry>,
    came_from: HashMap<Coordinate, Coordinate>,
    finalized: HashSet<Coordinate>,
    explored: Vec<Coordinate>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, priority: f64, coordinate: Coordinate) {
        self.frontier.push(FrontierEntry {
            priority,
            coordinate,
        });
    }

    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.frontier.pop()
    }

    pub fn set_predecessor(&mut self, node: Coordinate, from: Coordinate) {
        self.came_from.insert(node, from);
    }

    /// Records the first finalization of `c` in the exploration trace.
    ///
    /// Later pops of the same coordinate are not counted again.
    pub fn finalize(&mut self, c: Coordinate) -> bool {
        if self.finalized.insert(c) {
            self.explored.push(c);
            true
        } else {
            false
        }
    }

    pub fn nodes_explored(&self) -> usize {
        self.explored.len()
    }

    /// Walks predecessors back from `goal` and returns the path start-first.
    pub fn reconstruct_path(&self, goal: Coordinate) -> Vec<Coordinate> {
        let mut path = vec![goal];
        let mut current = goal;
        while let Some(&prev) = self.came_from.get(&current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }

    pub fn into_trace(self) -> Vec<Coordinate> {
        self.explored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frontier_pops_lowest_priority() {
        let mut state = SearchState::new();
        state.push(3.0, Coordinate::new(0, 0, 3));
        state.push(1.0, Coordinate::new(0, 0, 1));
        state.push(2.0, Coordinate::new(0, 0, 2));

        let order: Vec<f64> = std::iter::from_fn(|| state.pop())
            .map(|entry| entry.priority)
            .collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_frontier_ties_pop_smallest_coordinate() {
        let mut state = SearchState::new();
        state.push(1.0, Coordinate::new(1, 0, 0));
        state.push(1.0, Coordinate::new(0, 2, 0));
        state.push(1.0, Coordinate::new(0, 1, 4));

        assert_eq!(state.pop().map(|e| e.coordinate), Some(Coordinate::new(0, 1, 4)));
        assert_eq!(state.pop().map(|e| e.coordinate), Some(Coordinate::new(0, 2, 0)));
        assert_eq!(state.pop().map(|e| e.coordinate), Some(Coordinate::new(1, 0, 0)));
        assert!(state.pop().is_none());
    }

    #[test]
    fn test_finalize_counts_once() {
        let mut state = SearchState::new();
        let c = Coordinate::new(0, 1, 1);
        assert!(state.finalize(c));
        assert!(!state.finalize(c));
        assert_eq!(state.nodes_explored(), 1);
        assert_eq!(state.into_trace(), vec![c]);
    }

    #[test]
    fn test_reconstruct_path() {
        let mut state = SearchState::new();
        let a = Coordinate::new(0, 0, 0);
        let b = Coordinate::new(0, 1, 1);
        let c = Coordinate::new(1, 1, 1);
        state.set_predecessor(b, a);
        state.set_predecessor(c, b);
        assert_eq!(state.reconstruct_path(c), vec![a, b, c]);
        assert_eq!(state.reconstruct_path(a), vec![a]);
    }
}
